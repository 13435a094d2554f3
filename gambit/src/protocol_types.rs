use serde::{Deserialize, Serialize, Serializer};

use crate::{Board, Color, Identity, Piece};

/// A game snapshot as returned by `games/getDetails`.
///
/// The server owns the game. Fields this harness doesn't need are ignored.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub board: Board,
    pub is_active: bool,
    pub player_turn: Color,
    /// Always `None` while the game is active.
    #[serde(default)]
    pub winner: Option<Color>,
    /// Pieces captured from each color, indexed by [`Color::index()`].
    #[serde(default)]
    pub captured: [Vec<Piece>; 2],
    /// The unplaced pieces of each color.
    #[serde(default)]
    pub stashes: [Vec<Piece>; 2],
    #[serde(default)]
    pub on_decks: [Option<Piece>; 2],
    #[serde(default)]
    pub setup_complete: [bool; 2],
    #[serde(default)]
    pub players_ready: [bool; 2],
}

impl Game {
    pub fn stash(&self, color: Color) -> &[Piece] {
        &self.stashes[color.index()]
    }

    pub fn captured(&self, color: Color) -> &[Piece] {
        &self.captured[color.index()]
    }
}

/// A user account, as returned by `users/getList` and `users/create`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Response of `lobby/listenForMatch`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchStatus {
    Queued {
        #[serde(rename = "queueType", default)]
        queue_type: Option<String>,
        #[serde(rename = "queueLength", default)]
        queue_length: Option<usize>,
    },
    WaitingForGame {
        #[serde(rename = "matchId")]
        match_id: String,
    },
    Matched {
        #[serde(rename = "matchId")]
        match_id: String,
        #[serde(rename = "gameId")]
        game_id: String,
    },
}

/// Whose eyes a game snapshot is seen through.
///
/// A player's view hides the opponent's identities. The admin view shows everything.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum View {
    Player(Color),
    Admin,
}

impl Serialize for View {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            View::Player(color) => color.serialize(serializer),
            View::Admin => serializer.serialize_str("admin"),
        }
    }
}

impl std::str::FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(View::Admin),
            "0" | "white" => Ok(View::Player(Color::White)),
            "1" | "black" => Ok(View::Player(Color::Black)),
            other => Err(format!(
                "'{}' is not a view, expected admin, 0/white or 1/black",
                other
            )),
        }
    }
}

/// A piece placed on the back rank during setup.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub identity: Identity,
    pub color: Color,
    pub row: usize,
    pub col: usize,
}
