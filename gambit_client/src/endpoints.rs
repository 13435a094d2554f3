use gambit::{Color, Game, MatchStatus, Move, Setup, User, View};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::{ApiClient, ApiError, Transport};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GameRequest<'a, T: Serialize> {
    game_id: &'a str,
    color: Color,
    #[serde(flatten)]
    action: T,
}

#[derive(Serialize)]
struct NoAction {}

impl<T: Transport> ApiClient<T> {
    fn game_action<A: Serialize>(
        &mut self,
        endpoint: &str,
        game_id: &str,
        color: Color,
        action: A,
    ) -> Result<(), ApiError> {
        self.post(
            endpoint,
            &GameRequest {
                game_id,
                color,
                action,
            },
        )?;
        Ok(())
    }

    /// Looks the account up by email and only creates it if it doesn't exist yet.
    /// Returns the user id either way.
    pub fn create_or_get_user(&mut self, username: &str, email: &str) -> Result<String, ApiError> {
        let existing: Vec<User> = self.post_for("users/getList", &json!({ "email": email }))?;
        if let Some(user) = existing.into_iter().next() {
            debug!(email, id = %user.id, "User already exists");
            return Ok(user.id);
        }
        let user: User = self.post_for(
            "users/create",
            &json!({ "username": username, "email": email }),
        )?;
        info!(username, id = %user.id, "Created user");
        Ok(user.id)
    }

    pub fn enter_quickplay(&mut self, user_id: &str) -> Result<(), ApiError> {
        self.post("lobby/enterQuickplay", &json!({ "userId": user_id }))?;
        Ok(())
    }

    pub fn check_matchmaking(&mut self) -> Result<(), ApiError> {
        self.post("lobby/matchmaking/check", &json!({}))?;
        Ok(())
    }

    /// `None` if the server had nothing new to report (204).
    pub fn listen_for_match(&mut self, user_id: &str) -> Result<Option<MatchStatus>, ApiError> {
        match self.post("lobby/listenForMatch", &json!({ "userId": user_id }))? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|err| ApiError::Decode {
                    endpoint: String::from("lobby/listenForMatch"),
                    err,
                }),
            None => Ok(None),
        }
    }

    pub fn ready(&mut self, game_id: &str, color: Color) -> Result<(), ApiError> {
        self.game_action("gameAction/ready", game_id, color, NoAction {})
    }

    pub fn setup(&mut self, game_id: &str, color: Color, setup: &Setup) -> Result<(), ApiError> {
        self.game_action("gameAction/setup", game_id, color, setup)
    }

    pub fn submit_move(&mut self, game_id: &str, color: Color, mv: &Move) -> Result<(), ApiError> {
        self.game_action("gameAction/move", game_id, color, mv)
    }

    pub fn resign(&mut self, game_id: &str, color: Color) -> Result<(), ApiError> {
        self.game_action("gameAction/resign", game_id, color, NoAction {})
    }

    pub fn game_details(&mut self, game_id: &str, view: View) -> Result<Game, ApiError> {
        self.post_for(
            "games/getDetails",
            &json!({ "gameId": game_id, "color": view }),
        )
    }
}
