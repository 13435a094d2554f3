use std::io::Write;

use clap::Parser;
use db_tools::DatabaseArgs;
use gambit_client::{initialize_logging, LevelFilter};

/// Empties the ranked and quickplay matchmaking queues.
#[derive(Parser)]
struct Args {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Don't ask for confirmation
    #[arg(short, long)]
    yes: bool,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "warn")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level)?;

    if !args.yes && !confirm("Are you sure you want to empty all queues? (yes/no): ")? {
        println!("Operation cancelled");
        return Ok(());
    }

    let db = args.database.connect()?;
    let outcome = db_tools::empty_queues(&db)?;
    println!("{}", outcome);
    Ok(())
}

fn confirm(prompt: &str) -> std::io::Result<bool> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(db_tools::is_confirmation(&answer))
}
