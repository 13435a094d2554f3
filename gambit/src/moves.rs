use serde::{Deserialize, Serialize};

use crate::{Board, Color, Identity, Piece, Square};

/// How far bishops and rooks may slide.
pub const MAX_SLIDE_DISTANCE: usize = 3;

const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const DIAGONALS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

const ORTHOGONALS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A move as submitted to the server. The declaration is the identity the
/// mover claims for the piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub declaration: Identity,
}

/// Destinations for the piece standing on `from`, for a single ply.
///
/// This is a simplified ruleset: there is no notion of check, and captures
/// are not resolved. Every returned square is on the board and either empty
/// or held by the other color. Bombs and hidden pieces never move.
pub fn generate_moves(board: &Board, from: Square, piece: Piece) -> Vec<Square> {
    debug_assert_eq!(board.get(from), Some(piece));
    match piece.identity {
        Identity::Knight => step_moves(board, from, piece.color, &KNIGHT_OFFSETS),
        Identity::King => step_moves(board, from, piece.color, &KING_OFFSETS),
        Identity::Bishop => slide_moves(board, from, piece.color, &DIAGONALS),
        Identity::Rook => slide_moves(board, from, piece.color, &ORTHOGONALS),
        Identity::Bomb | Identity::Unknown => Vec::new(),
    }
}

/// Every move available to `color`, declaring each piece's true identity.
///
/// Pieces whose identity is hidden in this snapshot produce no moves.
pub fn legal_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();
    for (from, piece) in board.pieces_of(color) {
        moves.extend(
            generate_moves(board, from, piece)
                .into_iter()
                .map(|to| Move {
                    from,
                    to,
                    declaration: piece.identity,
                }),
        );
    }
    moves
}

fn can_land_on(board: &Board, square: Square, color: Color) -> bool {
    board.get(square).map_or(true, |other| other.color != color)
}

fn step_moves(board: &Board, from: Square, color: Color, offsets: &[(isize, isize)]) -> Vec<Square> {
    offsets
        .iter()
        .filter_map(|&(d_row, d_col)| board.offset(from, d_row, d_col))
        .filter(|&to| can_land_on(board, to, color))
        .collect()
}

fn slide_moves(board: &Board, from: Square, color: Color, directions: &[(isize, isize)]) -> Vec<Square> {
    let mut destinations = Vec::new();
    for &(d_row, d_col) in directions {
        let mut current = from;
        for _ in 0..MAX_SLIDE_DISTANCE {
            let Some(next) = board.offset(current, d_row, d_col) else {
                break;
            };
            match board.get(next) {
                None => destinations.push(next),
                Some(other) => {
                    // Captures end the ray on the enemy's square, friends block before it.
                    if other.color != color {
                        destinations.push(next);
                    }
                    break;
                }
            }
            current = next;
        }
    }
    destinations
}
