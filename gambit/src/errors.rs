use crate::Identity;

/// A numeric code from the server that doesn't map to a known color or identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: u8,
}

impl std::error::Error for UnknownCode {}

impl std::fmt::Display for UnknownCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown {} code {}", self.kind, self.code)
    }
}

/// The error type for turning a server snapshot into a [`Board`](crate::Board).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    EmptyBoard,
    RaggedBoard {
        row: usize,
        len: usize,
        expected: usize,
    },
}

impl std::error::Error for SnapshotError {}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::EmptyBoard => write!(f, "The board has no squares"),
            SnapshotError::RaggedBoard { row, len, expected } => write!(
                f,
                "Row {} of the board has {} squares, but row 0 has {}",
                row, len, expected
            ),
        }
    }
}

/// The error type for [`Setup::random()`](crate::Setup::random).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetupError {
    StashTooSmall { needed: usize, available: usize },
    MissingPiece { identity: Identity },
}

impl std::error::Error for SetupError {}

impl std::fmt::Display for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupError::StashTooSmall { needed, available } => write!(
                f,
                "Setup needs {} pieces from the stash, but only {} are available",
                needed, available
            ),
            SetupError::MissingPiece { identity } => {
                write!(f, "The stash contains no {:?}, which every setup needs", identity)
            }
        }
    }
}
