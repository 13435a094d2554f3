use clap::Parser;
use db_tools::DatabaseArgs;
use gambit_client::{initialize_logging, LevelFilter};

/// Prints every collection of the game database with its documents.
#[derive(Parser)]
struct Args {
    #[command(flatten)]
    database: DatabaseArgs,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "warn")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level)?;

    let db = args.database.connect()?;
    db_tools::show_db_state(&db, &mut std::io::stdout().lock())
}
