use std::path::PathBuf;

use clap::Parser;
use gambit::visualize_board;
use gambit_client::{initialize_logging, ApiClient, LevelFilter, Recorder};
use rand::rngs::StdRng;
use rand::SeedableRng;
use random_bot::{BotConfig, RandomBot};
use tracing::info;

/// Plays a quickplay game against itself on a Cloak's Gambit server.
#[derive(Parser)]
struct Args {
    /// Path to a JSON config file. The flags below take precedence over it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the API, e.g. http://localhost:3000/api/v1/
    #[arg(long)]
    base_url: Option<String>,

    /// How many plies to play before resigning
    #[arg(short, long)]
    plies: Option<usize>,

    /// Give up if no match was found after this many seconds
    #[arg(long)]
    match_timeout: Option<u64>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Record the session's requests as JSON files into this directory
    #[arg(short, long)]
    record_to: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level)?;

    let mut config = match &args.config {
        Some(path) => BotConfig::load(path)?,
        None => BotConfig::default(),
    };
    if let Some(base_url) = args.base_url {
        config.client.base_url = base_url;
    }
    if let Some(plies) = args.plies {
        config.plies = plies;
    }
    if args.match_timeout.is_some() {
        config.match_timeout_secs = args.match_timeout;
    }

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let rng = StdRng::seed_from_u64(seed);

    let recorder = args.record_to.map(Recorder::new).transpose()?;
    let api = ApiClient::connect(&config.client)?.with_recorder(recorder);

    let mut bot = RandomBot::new(api, rng, config);
    let report = bot.run_and_record()?;
    println!("Game {}", report.game_id);
    println!("Plies played: {}", report.plies_played);
    if let Some(color) = report.resigned {
        println!("{} resigned", color);
    }
    println!(
        "Winner: {}",
        report.winner.map(|c| c.name()).unwrap_or("None")
    );
    println!("\n{}\n", visualize_board(&report.final_board));

    Ok(())
}
