use anyhow::Context;
use clap::Parser;
use gambit::{visualize_board, visualize_pieces, Color, Game, View};
use gambit_client::{initialize_logging, ApiClient, ClientConfig, LevelFilter};
use tracing::debug;

/// Prints the state of a game on a Cloak's Gambit server.
#[derive(Parser)]
struct Args {
    /// Id of the game to show
    #[arg(short, long)]
    game_id: String,

    /// Whose view to fetch: "admin", "0"/"white" or "1"/"black"
    #[arg(long, default_value = "admin")]
    view: View,

    /// Base URL of the API
    #[arg(long, default_value = "http://localhost:3000/api/v1/")]
    base_url: String,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "warn")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level)?;

    let config = ClientConfig {
        base_url: args.base_url,
        ..ClientConfig::default()
    };
    let mut api = ApiClient::connect(&config)?;
    debug!(
        game_id = %args.game_id,
        view = ?args.view,
        base_url = %config.base_url,
        "Fetching game"
    );
    let game = api
        .game_details(&args.game_id, args.view)
        .with_context(|| format!("Could not fetch game {}", args.game_id))?;

    println!("{}", describe_game(&game));
    Ok(())
}

fn describe_game(game: &Game) -> String {
    let winner = game.winner.map(Color::name).unwrap_or("None");
    format!(
        "\nGame Status:\n\
         Active: {}\n\
         Current Turn: {}\n\
         Winner: {}\n\
         \n\
         Board:\n\
         \n\
         {}\n\
         \n\
         Captured Pieces:\n\
         White: [{}]\n\
         Black: [{}]",
        game.is_active,
        game.player_turn,
        winner,
        visualize_board(&game.board),
        visualize_pieces(game.captured(Color::White)),
        visualize_pieces(game.captured(Color::Black)),
    )
}
