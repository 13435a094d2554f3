use crate::{Board, Piece};

/// Drawn for squares without a piece.
pub const EMPTY_SQUARE: &str = "·";

/// Boards wider than this get `?` as the letter of the extra files.
pub const MAX_LETTERED_FILES: usize = 26;

fn file_letter(file: usize) -> char {
    if file < MAX_LETTERED_FILES {
        char::from(b'A' + file as u8)
    } else {
        '?'
    }
}

fn file_letters(files: usize, label_width: usize) -> String {
    let mut result = " ".repeat(label_width);
    for file in 0..files {
        result.push(' ');
        result.push(file_letter(file));
    }
    result
}

fn horizontal_rule(files: usize, label_width: usize) -> String {
    format!("{}{}", " ".repeat(label_width), "─".repeat(2 * files + 1))
}

/// Draws the board in array order: row 0 is the top line and carries the
/// highest rank label, the last row is rank 1.
///
/// ```text
///   A B C D E
///  ───────────
/// 5| · · ♔ · · |5
/// ...
/// 1| · · ♚ · · |1
///  ───────────
///   A B C D E
/// ```
///
/// Rank labels are right-aligned so taller boards keep their columns.
pub fn visualize_board(board: &Board) -> String {
    let ranks = board.ranks();
    let label_width = ranks.to_string().len();
    let letters = file_letters(board.files(), label_width);
    let rule = horizontal_rule(board.files(), label_width);

    let mut result = format!("{}\n{}\n", letters, rule);
    for (row_idx, row) in board.rows().enumerate() {
        let rank = ranks - row_idx;
        result += &format!("{:>width$}|", rank, width = label_width);
        for square in row {
            result.push(' ');
            match square {
                Some(piece) => result += piece.symbol(),
                None => result += EMPTY_SQUARE,
            }
        }
        result += &format!(" |{}\n", rank);
    }
    result += &format!("{}\n{}", rule, letters);
    result
}

/// Renders a list of pieces, e.g. the captured ones, as symbols.
pub fn visualize_pieces(pieces: &[Piece]) -> String {
    pieces
        .iter()
        .map(Piece::symbol)
        .collect::<Vec<_>>()
        .join(" ")
}
