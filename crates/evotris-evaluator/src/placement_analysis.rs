//! Analysis of a hypothetical piece placement.
//!
//! [`PlacementAnalysis::from_board`] drops a piece onto a private copy of the
//! board, removes completed rows and measures the result. The caller's board is
//! never touched, so the same board can be probed with every legal move of a
//! turn.
//!
//! # Usage
//!
//! ```
//! use evotris_engine::{Board, Move, PieceKind};
//! use evotris_evaluator::{board_feature::BoardFeature, placement_analysis::PlacementAnalysis};
//!
//! let board = Board::new(21, 10);
//! let analysis = PlacementAnalysis::from_board(&board, PieceKind::I, Move::new(1, 0));
//! let features = analysis.features().unwrap();
//! assert_eq!(features[BoardFeature::MaxHeight], 1);
//! assert_eq!(board.max_height(), 0);
//! ```

use evotris_engine::{Board, Move, PieceKind, Placement};

use crate::board_feature::FeatureVector;

/// Result of simulating one placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PlacementAnalysis {
    /// The piece settled; features describe the board after clearing.
    Settled(FeatureVector),
    /// The piece would reach the top of the board.
    GameOver,
}

impl PlacementAnalysis {
    /// Simulates dropping `piece` with `mv` onto a copy of `before_placement`.
    ///
    /// # Panics
    ///
    /// Panics if the move does not fit the board.
    #[must_use]
    pub fn from_board(before_placement: &Board, piece: PieceKind, mv: Move) -> Self {
        let mut board = before_placement.clone();
        match board.place(piece, mv) {
            Placement::Settled {
                landing_height,
                rows_cleared,
            } => {
                let shape = piece.shape(mv.orientation);
                Self::Settled(FeatureVector::measure(
                    &board,
                    shape,
                    landing_height,
                    rows_cleared,
                ))
            }
            Placement::GameOver => Self::GameOver,
        }
    }

    #[must_use]
    pub fn features(&self) -> Option<&FeatureVector> {
        match self {
            Self::Settled(features) => Some(features),
            Self::GameOver => None,
        }
    }
}

/// Simulates placing `piece` in the given orientation at column `slot`.
///
/// Shorthand for [`PlacementAnalysis::from_board`].
#[must_use]
pub fn simulate(
    board: &Board,
    piece: PieceKind,
    orientation: usize,
    slot: usize,
) -> PlacementAnalysis {
    PlacementAnalysis::from_board(board, piece, Move::new(orientation, slot))
}
