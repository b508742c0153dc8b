use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};

use super::MAX_COLS;

/// Upper bound on the number of legal moves for any piece on the widest board.
///
/// L, J and T have four orientations of widths 2, 3, 2, 3, which yields
/// `4 * cols - 6` moves.
pub const MAX_LEGAL_MOVES: usize = 4 * MAX_COLS - 6;

/// Enum representing the type of piece.
///
/// The discriminants double as indices into the geometry tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[repr(u8)]
pub enum PieceKind {
    /// O-piece.
    O = 0,
    /// I-piece.
    I = 1,
    /// L-piece.
    L = 2,
    /// J-piece.
    J = 3,
    /// T-piece.
    T = 4,
    /// S-piece.
    S = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::O,
        Self::I,
        Self::L,
        Self::J,
        Self::T,
        Self::S,
        Self::Z,
    ];

    /// Returns the number of distinct orientations of this piece.
    #[must_use]
    pub const fn orientations(self) -> usize {
        PIECE_SHAPES[self as usize].len()
    }

    /// Returns the geometry of this piece in the given orientation.
    ///
    /// # Panics
    ///
    /// Panics if `orientation >= self.orientations()`.
    #[must_use]
    pub const fn shape(self, orientation: usize) -> &'static PieceShape {
        &PIECE_SHAPES[self as usize][orientation]
    }

    /// Iterates over all orientations of this piece with their geometry.
    pub fn shapes(self) -> impl Iterator<Item = (usize, &'static PieceShape)> {
        PIECE_SHAPES[self as usize].iter().enumerate()
    }
}

/// Geometry of a piece in one orientation.
///
/// The piece occupies `width` consecutive columns. Within its local column
/// `i`, it fills rows `bottom[i]..top[i]` relative to the row it rests on.
/// `height` is the maximum of `top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceShape {
    pub width: usize,
    pub height: usize,
    pub bottom: &'static [usize],
    pub top: &'static [usize],
}

impl PieceShape {
    const fn new(
        width: usize,
        height: usize,
        bottom: &'static [usize],
        top: &'static [usize],
    ) -> Self {
        Self {
            width,
            height,
            bottom,
            top,
        }
    }

    /// Iterates over `(local column, bottom, top)` triples.
    pub fn columns(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.bottom
            .iter()
            .zip(self.top)
            .enumerate()
            .map(|(i, (&bottom, &top))| (i, bottom, top))
    }
}

const PIECE_SHAPES: [&[PieceShape]; PieceKind::LEN] = [
    // O
    &[PieceShape::new(2, 2, &[0, 0], &[2, 2])],
    // I
    &[
        PieceShape::new(1, 4, &[0], &[4]),
        PieceShape::new(4, 1, &[0, 0, 0, 0], &[1, 1, 1, 1]),
    ],
    // L
    &[
        PieceShape::new(2, 3, &[0, 0], &[3, 1]),
        PieceShape::new(3, 2, &[0, 1, 1], &[2, 2, 2]),
        PieceShape::new(2, 3, &[2, 0], &[3, 3]),
        PieceShape::new(3, 2, &[0, 0, 0], &[1, 1, 2]),
    ],
    // J
    &[
        PieceShape::new(2, 3, &[0, 0], &[1, 3]),
        PieceShape::new(3, 2, &[0, 0, 0], &[2, 1, 1]),
        PieceShape::new(2, 3, &[0, 2], &[3, 3]),
        PieceShape::new(3, 2, &[1, 1, 0], &[2, 2, 2]),
    ],
    // T
    &[
        PieceShape::new(2, 3, &[0, 1], &[3, 2]),
        PieceShape::new(3, 2, &[1, 0, 1], &[2, 2, 2]),
        PieceShape::new(2, 3, &[1, 0], &[2, 3]),
        PieceShape::new(3, 2, &[0, 0, 0], &[1, 2, 1]),
    ],
    // S
    &[
        PieceShape::new(3, 2, &[0, 0, 1], &[1, 2, 2]),
        PieceShape::new(2, 3, &[1, 0], &[3, 2]),
    ],
    // Z
    &[
        PieceShape::new(3, 2, &[1, 0, 0], &[2, 2, 1]),
        PieceShape::new(2, 3, &[0, 1], &[2, 3]),
    ],
];

/// A placement choice: which orientation to use and the leftmost column to drop into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{orientation}@{slot}")]
pub struct Move {
    pub orientation: usize,
    pub slot: usize,
}

impl Move {
    #[must_use]
    pub const fn new(orientation: usize, slot: usize) -> Self {
        Self { orientation, slot }
    }

    /// Checks whether this move fits `piece` within a board of `cols` columns.
    #[must_use]
    pub fn is_legal(self, piece: PieceKind, cols: usize) -> bool {
        self.orientation < piece.orientations()
            && self.slot + piece.shape(self.orientation).width <= cols
    }
}

/// Enumerates the legal moves of `piece` on a board with `cols` columns.
///
/// Moves are ordered by orientation, then by slot from left to right. Move
/// selection breaks ties by this order, so it must stay stable.
///
/// # Panics
///
/// Panics if `cols` exceeds [`MAX_COLS`].
#[must_use]
pub fn legal_moves(piece: PieceKind, cols: usize) -> ArrayVec<Move, MAX_LEGAL_MOVES> {
    assert!(cols <= MAX_COLS, "board too wide: {cols} > {MAX_COLS}");
    let mut moves = ArrayVec::new();
    for (orientation, shape) in piece.shapes() {
        if shape.width > cols {
            continue;
        }
        for slot in 0..=cols - shape.width {
            moves.push(Move::new(orientation, slot));
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_profiles_are_consistent() {
        for kind in PieceKind::ALL {
            for (orientation, shape) in kind.shapes() {
                assert_eq!(shape.bottom.len(), shape.width, "{kind}#{orientation}");
                assert_eq!(shape.top.len(), shape.width, "{kind}#{orientation}");
                assert!(shape.columns().all(|(_, b, t)| b < t), "{kind}#{orientation}");
                assert_eq!(
                    shape.top.iter().copied().max(),
                    Some(shape.height),
                    "{kind}#{orientation}"
                );
                // every piece rests on at least one column
                assert!(shape.bottom.contains(&0), "{kind}#{orientation}");
            }
        }
    }

    #[test]
    fn test_every_piece_has_four_cells() {
        for kind in PieceKind::ALL {
            for (orientation, shape) in kind.shapes() {
                let cells: usize = shape.columns().map(|(_, b, t)| t - b).sum();
                assert_eq!(cells, 4, "{kind}#{orientation}");
            }
        }
    }

    #[test]
    fn test_legal_move_counts_on_standard_board() {
        let expected = [
            (PieceKind::O, 9),
            (PieceKind::I, 17),
            (PieceKind::L, 34),
            (PieceKind::J, 34),
            (PieceKind::T, 34),
            (PieceKind::S, 17),
            (PieceKind::Z, 17),
        ];
        for (kind, count) in expected {
            assert_eq!(legal_moves(kind, 10).len(), count, "{kind}");
        }
    }

    #[test]
    fn test_legal_moves_order() {
        let moves = legal_moves(PieceKind::I, 10);
        assert_eq!(moves[0], Move::new(0, 0));
        assert_eq!(moves[9], Move::new(0, 9));
        assert_eq!(moves[10], Move::new(1, 0));
        assert_eq!(moves[16], Move::new(1, 6));
        assert!(moves.iter().all(|mv| mv.is_legal(PieceKind::I, 10)));
        assert!(!Move::new(1, 7).is_legal(PieceKind::I, 10));
        assert!(!Move::new(2, 0).is_legal(PieceKind::I, 10));
    }

    #[test]
    fn test_widest_board_fits_move_buffer() {
        for kind in PieceKind::ALL {
            assert!(legal_moves(kind, MAX_COLS).len() <= MAX_LEGAL_MOVES);
        }
    }
}
