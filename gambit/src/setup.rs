use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Color, Identity, Piece, PlacedPiece, SetupError};

/// The pieces a player puts on their back rank, plus the one kept on deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setup {
    pub pieces: Vec<PlacedPiece>,
    pub on_deck: Piece,
}

impl Setup {
    /// Shuffles the stash, fills the back rank `row` with one piece per file
    /// and nominates a random leftover piece as the on-deck piece.
    ///
    /// The server refuses setups without a king on the board, so if the
    /// shuffle left the king off the back rank it is swapped in for a
    /// random placed piece.
    pub fn random<R: Rng>(
        stash: &[Piece],
        color: Color,
        row: usize,
        files: usize,
        rng: &mut R,
    ) -> Result<Setup, SetupError> {
        let needed = files + 1;
        if stash.len() < needed {
            return Err(SetupError::StashTooSmall {
                needed,
                available: stash.len(),
            });
        }

        let mut pool: Vec<Piece> = stash.to_vec();
        pool.shuffle(rng);
        let king_idx = pool
            .iter()
            .position(|piece| piece.identity == Identity::King)
            .ok_or(SetupError::MissingPiece {
                identity: Identity::King,
            })?;
        if king_idx >= files {
            let replaced = rng.gen_range(0..files);
            pool.swap(king_idx, replaced);
        }

        let leftover = &pool[files..];
        let on_deck = *leftover.choose(rng).ok_or(SetupError::StashTooSmall {
            needed,
            available: stash.len(),
        })?;

        let pieces = pool[..files]
            .iter()
            .enumerate()
            .map(|(col, piece)| PlacedPiece {
                identity: piece.identity,
                color,
                row,
                col,
            })
            .collect();

        Ok(Setup { pieces, on_deck })
    }
}
