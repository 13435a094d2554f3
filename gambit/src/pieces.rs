use serde::{Deserialize, Serialize};

use crate::UnknownCode;

/// The side a piece belongs to. Encoded as `0` and `1` on the wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Color {
    /// The first player, whose back rank is row 0.
    White = 0,
    /// The second player, whose back rank is the last row.
    Black = 1,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Index into the per-color arrays of a [`Game`](crate::Game).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Color> for u8 {
    fn from(color: Color) -> u8 {
        color as u8
    }
}

impl TryFrom<u8> for Color {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Color::White),
            1 => Ok(Color::Black),
            _ => Err(UnknownCode {
                kind: "color",
                code,
            }),
        }
    }
}

/// What a piece is. The server hides the opponent's identities as [`Identity::Unknown`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Identity {
    Unknown = 0,
    King = 1,
    Bomb = 2,
    Bishop = 3,
    Rook = 4,
    Knight = 5,
}

impl From<Identity> for u8 {
    fn from(identity: Identity) -> u8 {
        identity as u8
    }
}

impl TryFrom<u8> for Identity {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Identity::Unknown),
            1 => Ok(Identity::King),
            2 => Ok(Identity::Bomb),
            3 => Ok(Identity::Bishop),
            4 => Ok(Identity::Rook),
            5 => Ok(Identity::Knight),
            _ => Err(UnknownCode {
                kind: "identity",
                code,
            }),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub identity: Identity,
}

impl Piece {
    pub fn new(color: Color, identity: Identity) -> Self {
        Self { color, identity }
    }

    /// The glyph used for this piece when drawing a board.
    pub fn symbol(&self) -> &'static str {
        match (self.color, self.identity) {
            (_, Identity::Unknown) => "?",
            (_, Identity::Bomb) => "💣",
            (Color::White, Identity::King) => "♔",
            (Color::White, Identity::Bishop) => "♗",
            (Color::White, Identity::Rook) => "♖",
            (Color::White, Identity::Knight) => "♘",
            (Color::Black, Identity::King) => "♚",
            (Color::Black, Identity::Bishop) => "♝",
            (Color::Black, Identity::Rook) => "♜",
            (Color::Black, Identity::Knight) => "♞",
        }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
