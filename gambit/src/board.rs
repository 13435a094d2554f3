use serde::{Deserialize, Serialize};

use crate::{Color, Piece, SnapshotError};

/// A square on the board. Serialized as `{"row": .., "col": ..}`, which is
/// what the move endpoint expects.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

impl Square {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A rectangular snapshot of the board.
///
/// Row 0 is White's back rank. On the wire this is a list of rows, each a list
/// of `null` or a piece.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<Vec<Option<Piece>>>",
    into = "Vec<Vec<Option<Piece>>>"
)]
pub struct Board {
    ranks: usize,
    files: usize,
    /// Row-major, `ranks * files` entries.
    squares: Vec<Option<Piece>>,
}

impl Board {
    pub fn empty(ranks: usize, files: usize) -> Self {
        assert!(ranks > 0 && files > 0);
        Self {
            ranks,
            files,
            squares: vec![None; ranks * files],
        }
    }

    /// Number of rows.
    pub fn ranks(&self) -> usize {
        self.ranks
    }

    /// Number of columns.
    pub fn files(&self) -> usize {
        self.files
    }

    /// Returns `None` for empty squares. Panics if the square is out of bounds.
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares[self.index(square)]
    }

    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        let idx = self.index(square);
        self.squares[idx] = piece;
    }

    /// The square reached by stepping `(d_row, d_col)` away from `square`, if it is on the board.
    pub fn offset(&self, square: Square, d_row: isize, d_col: isize) -> Option<Square> {
        let row = square.row.checked_add_signed(d_row)?;
        let col = square.col.checked_add_signed(d_col)?;
        (row < self.ranks && col < self.files).then(|| Square::new(row, col))
    }

    /// The row on which `color` places its pieces during setup.
    pub fn back_rank(&self, color: Color) -> usize {
        match color {
            Color::White => 0,
            Color::Black => self.ranks - 1,
        }
    }

    /// All occupied squares, in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares.iter().enumerate().filter_map(|(idx, square)| {
            square.map(|piece| (Square::new(idx / self.files, idx % self.files), piece))
        })
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// Iterates over the rows, starting at row 0.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[Option<Piece>]> + ExactSizeIterator + '_ {
        self.squares.chunks(self.files)
    }

    fn index(&self, square: Square) -> usize {
        assert!(
            square.row < self.ranks && square.col < self.files,
            "square {:?} is outside of the {}x{} board",
            square,
            self.ranks,
            self.files
        );
        square.row * self.files + square.col
    }
}

impl TryFrom<Vec<Vec<Option<Piece>>>> for Board {
    type Error = SnapshotError;

    fn try_from(rows: Vec<Vec<Option<Piece>>>) -> Result<Self, Self::Error> {
        let files = rows.first().map(Vec::len).unwrap_or(0);
        if files == 0 {
            return Err(SnapshotError::EmptyBoard);
        }
        if let Some((row, len)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != files)
        {
            return Err(SnapshotError::RaggedBoard {
                row,
                len,
                expected: files,
            });
        }
        Ok(Self {
            ranks: rows.len(),
            files,
            squares: rows.into_iter().flatten().collect(),
        })
    }
}

impl From<Board> for Vec<Vec<Option<Piece>>> {
    fn from(board: Board) -> Self {
        board.rows().map(<[Option<Piece>]>::to_vec).collect()
    }
}
