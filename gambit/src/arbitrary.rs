use quickcheck::{Arbitrary, Gen};

use crate::{Board, Color, Identity, Piece, Square, MAX_SLIDE_DISTANCE};

impl Arbitrary for Color {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&Color::BOTH).unwrap()
    }
}

impl Arbitrary for Identity {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&[
            Identity::Unknown,
            Identity::King,
            Identity::Bomb,
            Identity::Bishop,
            Identity::Rook,
            Identity::Knight,
        ])
        .unwrap()
    }
}

impl Arbitrary for Piece {
    fn arbitrary(g: &mut Gen) -> Self {
        Piece::new(Color::arbitrary(g), Identity::arbitrary(g))
    }
}

fn random_board(g: &mut Gen) -> Board {
    let ranks = 1 + usize::arbitrary(g) % 7;
    let files = 1 + usize::arbitrary(g) % 7;
    let mut board = Board::empty(ranks, files);
    for row in 0..ranks {
        for col in 0..files {
            if u8::arbitrary(g) % 3 == 0 {
                board.set(Square::new(row, col), Some(Piece::arbitrary(g)));
            }
        }
    }
    board
}

/// A random board with some piece standing on `square`.
#[derive(Clone, Debug)]
pub struct BoardWithPiece {
    pub board: Board,
    pub square: Square,
    pub piece: Piece,
}

impl Arbitrary for BoardWithPiece {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut board = random_board(g);
        let square = Square::new(
            usize::arbitrary(g) % board.ranks(),
            usize::arbitrary(g) % board.files(),
        );
        let piece = Piece::arbitrary(g);
        board.set(square, Some(piece));
        BoardWithPiece {
            board,
            square,
            piece,
        }
    }
}

/// A bishop or rook on a 5x5 board with at least three free squares' worth of
/// board in `direction`. The only piece on that ray is the optional blocker,
/// given as its distance and color.
#[derive(Clone, Debug)]
pub struct Slider {
    pub board: Board,
    pub square: Square,
    pub piece: Piece,
    pub direction: (isize, isize),
    pub blocker: Option<(usize, Color)>,
}

fn coordinate_with_room(g: &mut Gen, step: isize) -> usize {
    // On a 5x5 board, three steps fit from 0..=1 going up and 3..=4 going down.
    match step {
        1 => usize::arbitrary(g) % 2,
        -1 => 3 + usize::arbitrary(g) % 2,
        _ => usize::arbitrary(g) % 5,
    }
}

impl Arbitrary for Slider {
    fn arbitrary(g: &mut Gen) -> Self {
        let identity = *g.choose(&[Identity::Bishop, Identity::Rook]).unwrap();
        let directions: &[(isize, isize)] = match identity {
            Identity::Bishop => &[(-1, -1), (-1, 1), (1, -1), (1, 1)],
            _ => &[(-1, 0), (1, 0), (0, -1), (0, 1)],
        };
        let direction = *g.choose(directions).unwrap();
        let square = Square::new(
            coordinate_with_room(g, direction.0),
            coordinate_with_room(g, direction.1),
        );
        let piece = Piece::new(Color::arbitrary(g), identity);

        let mut board = Board::empty(5, 5);
        let mut ray = Vec::new();
        let mut current = square;
        for _ in 0..MAX_SLIDE_DISTANCE {
            current = board.offset(current, direction.0, direction.1).unwrap();
            ray.push(current);
        }
        // Noise everywhere except on the ray itself
        for row in 0..5 {
            for col in 0..5 {
                let other = Square::new(row, col);
                if other != square && !ray.contains(&other) && u8::arbitrary(g) % 3 == 0 {
                    board.set(other, Some(Piece::arbitrary(g)));
                }
            }
        }
        board.set(square, Some(piece));

        let blocker = if bool::arbitrary(g) {
            let distance = 1 + usize::arbitrary(g) % MAX_SLIDE_DISTANCE;
            let color = Color::arbitrary(g);
            board.set(
                ray[distance - 1],
                Some(Piece::new(color, Identity::arbitrary(g))),
            );
            Some((distance, color))
        } else {
            None
        };

        Slider {
            board,
            square,
            piece,
            direction,
            blocker,
        }
    }
}
