use std::time::Instant;

use anyhow::{bail, Context};
use gambit::{legal_moves, visualize_board, Board, Color, Game, MatchStatus, Move, Setup, View};
use gambit_client::{ApiClient, ApiError, Transport};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, error, info, warn};

use crate::BotConfig;

/// What happened in a game driven by [`RandomBot::run()`].
#[derive(Clone, Debug)]
pub struct GameReport {
    pub game_id: String,
    pub plies_played: usize,
    /// Set if the bot resigned because the ply budget ran out.
    pub resigned: Option<Color>,
    pub winner: Option<Color>,
    pub final_board: Board,
}

enum PlyOutcome {
    Moved(Move),
    /// No move went through; the game should be fetched again.
    Stalled,
}

/// Plays both sides of a quickplay game with uniformly random moves.
pub struct RandomBot<T: Transport> {
    api: ApiClient<T>,
    rng: StdRng,
    config: BotConfig,
}

/// Rejections of idempotent lobby/ready calls usually mean the step already
/// happened, e.g. when re-running against the same accounts.
fn tolerate_rejection(result: Result<(), ApiError>, what: &str) -> anyhow::Result<()> {
    match result {
        Err(err) if err.is_rejection() => {
            warn!("{} was rejected: {}", what, err.message().unwrap_or("no message"));
            Ok(())
        }
        other => other.with_context(|| format!("{} failed", what)),
    }
}

impl<T: Transport> RandomBot<T> {
    pub fn new(api: ApiClient<T>, rng: StdRng, config: BotConfig) -> Self {
        Self { api, rng, config }
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut ApiClient<T> {
        &mut self.api
    }

    /// Runs one game from account creation to its end.
    ///
    /// Returns an error only if the server can't be worked with, not when
    /// individual moves are refused.
    pub fn run(&mut self) -> anyhow::Result<GameReport> {
        let user_ids = self.register_players()?;
        for user_id in &user_ids {
            tolerate_rejection(self.api.enter_quickplay(user_id), "Entering quickplay")?;
        }

        let game_id = self.wait_for_match(&user_ids[0])?;

        for color in Color::BOTH {
            tolerate_rejection(self.api.ready(&game_id, color), "Getting ready")?;
        }
        for color in Color::BOTH {
            self.set_up(&game_id, color)?;
        }

        let plies_played = self.play(&game_id)?;
        self.finish(game_id, plies_played)
    }

    /// Like [`Self::run()`], then writes the session transcript if the client
    /// records one. A transcript that can't be written is logged and the
    /// run's own result is returned.
    pub fn run_and_record(&mut self) -> anyhow::Result<GameReport> {
        let result = self.run();
        if let Some(recorder) = self.api.recorder_mut() {
            match recorder.write_session_recording() {
                Ok(path) => info!(path = %path.display(), "Wrote recording"),
                Err(err) => error!("Could not write the recording: {:#}", err),
            }
        }
        result
    }

    fn register_players(&mut self) -> anyhow::Result<[String; 2]> {
        let accounts = self.config.players.clone();
        let mut ids = [String::new(), String::new()];
        for (id, account) in ids.iter_mut().zip(&accounts) {
            *id = self
                .api
                .create_or_get_user(&account.username, &account.email)
                .with_context(|| format!("Could not create or find user '{}'", account.username))?;
        }
        Ok(ids)
    }

    /// Polls until the server reports a match.
    ///
    /// Only a rejection ends the wait early. Transport and server failures are
    /// logged and polling continues, bounded by the optional match timeout.
    fn wait_for_match(&mut self, user_id: &str) -> anyhow::Result<String> {
        let started = Instant::now();
        loop {
            match self.api.listen_for_match(user_id) {
                Ok(Some(MatchStatus::Matched { match_id, game_id })) => {
                    info!(%match_id, %game_id, "Matched");
                    return Ok(game_id);
                }
                Ok(Some(status)) => debug!(?status, "Waiting for a match"),
                Ok(None) => debug!("No matchmaking update"),
                Err(err) if err.is_rejection() => {
                    return Err(err).context("Listening for a match failed");
                }
                Err(err) => warn!("Listening for a match failed: {}, polling again", err),
            }
            match self.api.check_matchmaking() {
                Ok(()) => {}
                Err(err) if err.is_rejection() => {
                    return Err(err).context("Matchmaking check failed");
                }
                Err(err) => warn!("Matchmaking check failed: {}, polling again", err),
            }

            if let Some(limit) = self.config.match_timeout() {
                if started.elapsed() >= limit {
                    bail!("No match found within {} seconds", limit.as_secs());
                }
            }
            std::thread::sleep(self.config.poll_interval());
        }
    }

    fn set_up(&mut self, game_id: &str, color: Color) -> anyhow::Result<()> {
        let game = self.api.game_details(game_id, View::Player(color))?;
        if game.setup_complete[color.index()] {
            info!(%color, "Setup already complete");
            return Ok(());
        }
        let row = game.board.back_rank(color);
        let setup = Setup::random(
            game.stash(color),
            color,
            row,
            game.board.files(),
            &mut self.rng,
        )
        .with_context(|| format!("Could not plan the setup for {}", color))?;
        self.api
            .setup(game_id, color, &setup)
            .with_context(|| format!("Setup for {} failed", color))?;
        info!(%color, on_deck = %setup.on_deck, "Setup done");
        Ok(())
    }

    /// Returns the number of plies that were played.
    fn play(&mut self, game_id: &str) -> anyhow::Result<usize> {
        let mut plies_played = 0;
        let mut stalls = 0;
        while plies_played < self.config.plies {
            let game = self.api.game_details(game_id, View::Admin)?;
            if !game.is_active {
                info!(plies_played, "Game ended");
                break;
            }
            debug!("\n{}", visualize_board(&game.board));

            match self.play_ply(game_id, &game) {
                PlyOutcome::Moved(mv) => {
                    plies_played += 1;
                    stalls = 0;
                    info!(
                        ply = plies_played,
                        color = %game.player_turn,
                        piece = ?mv.declaration,
                        from = ?(mv.from.row, mv.from.col),
                        to = ?(mv.to.row, mv.to.col),
                        "Moved"
                    );
                }
                PlyOutcome::Stalled => {
                    stalls += 1;
                    if stalls >= self.config.max_stalled_plies {
                        bail!("No move went through in {} attempts in a row", stalls);
                    }
                    std::thread::sleep(self.config.poll_interval());
                }
            }
        }
        Ok(plies_played)
    }

    /// Tries the side to move's candidates in random order until one is accepted.
    ///
    /// A rejection means the server considers the move illegal, so the next
    /// candidate is tried. Any other failure ends the attempt.
    fn play_ply(&mut self, game_id: &str, game: &Game) -> PlyOutcome {
        let color = game.player_turn;
        let mut candidates = legal_moves(&game.board, color);
        if candidates.is_empty() {
            warn!(%color, "No candidate moves");
            return PlyOutcome::Stalled;
        }
        candidates.shuffle(&mut self.rng);

        for mv in candidates {
            match self.api.submit_move(game_id, color, &mv) {
                Ok(()) => return PlyOutcome::Moved(mv),
                Err(err) if err.is_rejection() => {
                    debug!(?mv, reason = err.message().unwrap_or("no message"), "Move rejected");
                }
                Err(err) => {
                    warn!("{}, fetching the game again", err);
                    return PlyOutcome::Stalled;
                }
            }
        }
        warn!(%color, "Every candidate move was rejected");
        PlyOutcome::Stalled
    }

    fn finish(&mut self, game_id: String, plies_played: usize) -> anyhow::Result<GameReport> {
        let game = self.api.game_details(&game_id, View::Admin)?;
        let mut resigned = None;
        let mut winner = game.winner;
        if game.is_active {
            let color = game.player_turn;
            self.api
                .resign(&game_id, color)
                .with_context(|| format!("{} could not resign", color))?;
            info!(%color, plies_played, "Resigned after running out of plies");
            resigned = Some(color);
            winner = Some(color.opponent());
        }
        Ok(GameReport {
            game_id,
            plies_played,
            resigned,
            winner,
            final_board: game.board,
        })
    }
}

#[cfg(test)]
mod tests {
    use gambit_client::testing::ScriptedTransport;
    use gambit_client::{ClientConfig, RawResponse, Recorder};
    use rand::SeedableRng;
    use serde_json::{json, Value};

    use super::*;

    fn ok() -> Result<RawResponse, ApiError> {
        Ok(RawResponse::new(200, r#"{"message":"ok"}"#))
    }

    fn stash(color: u8) -> Value {
        [4, 4, 3, 3, 5, 5, 1, 2]
            .iter()
            .map(|identity| json!({"color": color, "identity": identity}))
            .collect()
    }

    fn game_json(active: bool) -> Value {
        let mut board = vec![vec![Value::Null; 5]; 6];
        board[0][1] = json!({"color": 0, "identity": 5});
        board[0][2] = json!({"color": 0, "identity": 1});
        board[5][2] = json!({"color": 1, "identity": 1});
        let winner = if active { Value::Null } else { json!(1) };
        json!({
            "_id": "g1",
            "board": board,
            "isActive": active,
            "playerTurn": 0,
            "winner": winner,
            "captured": [[], []],
            "stashes": [stash(0), stash(1)],
            "setupComplete": [false, false]
        })
    }

    /// A server that matches on the third poll, rejects the first move and
    /// answers `move_status` for every later one.
    fn fake_server(move_status: u16) -> ScriptedTransport {
        let mut listens = 0;
        let mut moves = 0;
        let mut resigned = false;
        ScriptedTransport::new(move |endpoint, body| match endpoint {
            "users/getList" => Ok(RawResponse::new(200, "[]")),
            "users/create" => Ok(RawResponse::new(
                201,
                &json!({"_id": body["username"]}).to_string(),
            )),
            "lobby/enterQuickplay" | "lobby/matchmaking/check" | "gameAction/ready"
            | "gameAction/setup" => ok(),
            "lobby/listenForMatch" => {
                listens += 1;
                if listens < 3 {
                    Ok(RawResponse::new(200, r#"{"status":"queued"}"#))
                } else {
                    Ok(RawResponse::new(
                        200,
                        r#"{"status":"matched","matchId":"m1","gameId":"g1"}"#,
                    ))
                }
            }
            "games/getDetails" => Ok(RawResponse::new(200, &game_json(!resigned).to_string())),
            "gameAction/move" => {
                moves += 1;
                if moves == 1 {
                    Ok(RawResponse::new(400, r#"{"message":"Illegal move"}"#))
                } else {
                    Ok(RawResponse::new(move_status, r#"{"message":"whatever"}"#))
                }
            }
            "gameAction/resign" => {
                resigned = true;
                ok()
            }
            other => panic!("Unexpected endpoint {}", other),
        })
    }

    fn bot(transport: ScriptedTransport, plies: usize) -> RandomBot<ScriptedTransport> {
        let config = BotConfig {
            client: ClientConfig {
                backoff_ms: 0,
                ..ClientConfig::default()
            },
            plies,
            poll_interval_ms: 0,
            max_stalled_plies: 2,
            ..BotConfig::default()
        };
        let api = ApiClient::new(transport, &config.client);
        RandomBot::new(api, StdRng::seed_from_u64(7), config)
    }

    #[test]
    fn plays_a_game_and_resigns() {
        let mut bot = bot(fake_server(200), 2);
        let report = bot.run().unwrap();

        assert_eq!(report.game_id, "g1");
        assert_eq!(report.plies_played, 2);
        assert_eq!(report.resigned, Some(Color::White));
        assert_eq!(report.winner, Some(Color::Black));

        let transport = bot.api().transport();
        assert_eq!(transport.calls_to("users/create").count(), 2);
        assert_eq!(transport.calls_to("lobby/listenForMatch").count(), 3);
        assert_eq!(transport.calls_to("gameAction/ready").count(), 2);
        assert_eq!(transport.calls_to("gameAction/move").count(), 3);
        assert_eq!(transport.calls_to("gameAction/resign").count(), 1);

        let setups: Vec<&Value> = transport.calls_to("gameAction/setup").collect();
        assert_eq!(setups.len(), 2);
        for (setup, (color, row)) in setups.iter().zip([(0, 0), (1, 5)]) {
            assert_eq!(setup["gameId"], "g1");
            assert_eq!(setup["color"], color);
            let pieces = setup["pieces"].as_array().unwrap();
            assert_eq!(pieces.len(), 5);
            assert!(pieces.iter().all(|p| p["row"] == row));
            assert!(pieces.iter().any(|p| p["identity"] == 1));
        }

        // Every submitted move starts on one of White's pieces
        for mv in transport.calls_to("gameAction/move") {
            assert_eq!(mv["color"], 0);
            assert_eq!(mv["from"]["row"], 0);
        }
    }

    #[test]
    fn server_errors_stall_instead_of_trying_other_moves() {
        let mut bot = bot(fake_server(500), 3);
        let err = bot.run().unwrap_err();
        assert!(err.to_string().contains("in a row"));

        // One rejected move, then a single candidate per stall, sent three times each
        let transport = bot.api().transport();
        assert_eq!(transport.calls_to("gameAction/move").count(), 1 + 3 + 3);
        assert_eq!(transport.calls_to("gameAction/resign").count(), 0);
    }

    /// Knows every account and answers `listenForMatch` with `listen`.
    fn matchmaking_server(
        mut listen: impl FnMut() -> Result<RawResponse, ApiError> + 'static,
    ) -> ScriptedTransport {
        ScriptedTransport::new(move |endpoint, body| match endpoint {
            "users/getList" => Ok(RawResponse::new(
                200,
                &json!([{"_id": body["email"]}]).to_string(),
            )),
            "lobby/listenForMatch" => listen(),
            _ => ok(),
        })
    }

    #[test]
    fn matchmaking_can_time_out() {
        let transport = matchmaking_server(|| Ok(RawResponse::new(204, "")));
        let mut bot = bot(transport, 6);
        bot.config.match_timeout_secs = Some(0);
        let err = bot.run().unwrap_err();
        assert!(err.to_string().contains("No match found"));
        assert_eq!(bot.api().transport().calls_to("users/create").count(), 0);
    }

    #[test]
    fn matchmaking_survives_unreachable_server() {
        let mut listens = 0;
        let transport = matchmaking_server(move || {
            listens += 1;
            if listens <= 3 {
                Err(ApiError::Transport("timed out".into()))
            } else {
                Ok(RawResponse::new(
                    200,
                    r#"{"status":"matched","matchId":"m1","gameId":"g1"}"#,
                ))
            }
        });
        let mut bot = bot(transport, 0);
        assert_eq!(bot.wait_for_match("testbot_one@example.com").unwrap(), "g1");

        // The client's own retries used up the first three, then polling went on
        let transport = bot.api().transport();
        assert_eq!(transport.calls_to("lobby/listenForMatch").count(), 4);
        assert_eq!(transport.calls_to("lobby/matchmaking/check").count(), 1);
    }

    #[test]
    fn matchmaking_keeps_polling_through_server_errors() {
        let mut listens = 0;
        let transport = matchmaking_server(move || {
            listens += 1;
            match listens {
                1..=3 => Ok(RawResponse::new(503, "")),
                4 => Ok(RawResponse::new(200, r#"{"status":"queued"}"#)),
                _ => Ok(RawResponse::new(
                    200,
                    r#"{"status":"matched","matchId":"m1","gameId":"g2"}"#,
                )),
            }
        });
        let mut bot = bot(transport, 0);
        assert_eq!(bot.wait_for_match("u").unwrap(), "g2");
        assert_eq!(bot.api().transport().calls_to("lobby/listenForMatch").count(), 5);
    }

    #[test]
    fn matchmaking_stops_when_rejected() {
        let transport = matchmaking_server(|| {
            Ok(RawResponse::new(400, r#"{"message":"User not in queue"}"#))
        });
        let mut bot = bot(transport, 0);
        let err = bot.wait_for_match("u").unwrap_err();
        assert!(err.to_string().contains("Listening for a match failed"));
        assert_eq!(bot.api().transport().calls_to("lobby/listenForMatch").count(), 1);
        assert_eq!(bot.api().transport().calls_to("lobby/matchmaking/check").count(), 0);
    }

    #[test]
    fn unreachable_matchmaking_still_times_out() {
        let transport =
            matchmaking_server(|| Err(ApiError::Transport("connection refused".into())));
        let mut bot = bot(transport, 0);
        bot.config.match_timeout_secs = Some(0);
        let err = bot.wait_for_match("u").unwrap_err();
        assert!(err.to_string().contains("No match found"));
    }

    fn recording_bot(directory: &std::path::Path) -> RandomBot<ScriptedTransport> {
        std::fs::create_dir_all(directory).unwrap();
        let recorder = Recorder::new(directory.to_path_buf()).unwrap();
        let config = BotConfig {
            client: ClientConfig {
                backoff_ms: 0,
                ..ClientConfig::default()
            },
            poll_interval_ms: 0,
            match_timeout_secs: Some(0),
            ..BotConfig::default()
        };
        let transport = matchmaking_server(|| Ok(RawResponse::new(204, "")));
        let api = ApiClient::new(transport, &config.client).with_recorder(Some(recorder));
        RandomBot::new(api, StdRng::seed_from_u64(7), config)
    }

    #[test]
    fn failed_runs_are_recorded() {
        let dir = std::env::temp_dir().join(format!("random_bot_rec_{}", std::process::id()));
        let mut bot = recording_bot(&dir);
        let err = bot.run_and_record().unwrap_err();
        assert!(err.to_string().contains("No match found"));
        assert!(dir.join("session_000001.json").is_file());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unwritable_recording_keeps_the_run_error() {
        let dir = std::env::temp_dir().join(format!("random_bot_gone_{}", std::process::id()));
        let mut bot = recording_bot(&dir);
        std::fs::remove_dir_all(&dir).unwrap();
        let err = bot.run_and_record().unwrap_err();
        assert!(err.to_string().contains("No match found"));
    }

    #[test]
    fn finished_games_are_not_resigned() {
        let mut bot = bot(fake_server(200), 0);
        // Finish straight away: the fake game is still active, so this resigns.
        let report = bot.run().unwrap();
        assert_eq!(report.plies_played, 0);
        assert_eq!(report.resigned, Some(Color::White));

        // A second report on the now-finished game doesn't resign again.
        let report = bot.finish(String::from("g1"), 0).unwrap();
        assert_eq!(report.resigned, None);
        assert_eq!(report.winner, Some(Color::Black));
        assert_eq!(bot.api().transport().calls_to("gameAction/resign").count(), 1);
    }
}
