pub use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs the compact stderr logger shared by the binaries.
///
/// Fails if a global subscriber is already set.
pub fn initialize_logging(level: LevelFilter) -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialization_fails_without_panicking() {
        // Whichever call installs the logger, the one after it is refused
        let _ = initialize_logging(LevelFilter::OFF);
        assert!(initialize_logging(LevelFilter::WARN).is_err());
    }
}
