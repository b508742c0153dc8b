//! Board features measured after a hypothetical placement.
//!
//! Every placement is summarized by a [`FeatureVector`]: seven integer
//! measurements in a fixed order. The order is part of the weight format, so a
//! weight vector's `i`-th entry always multiplies the `i`-th feature.
//!
//! | # | Feature                            | Sign convention |
//! |---|------------------------------------|-----------------|
//! | 0 | [`BoardFeature::LandingHeight`]     | penalty         |
//! | 1 | [`BoardFeature::RowsCleared`]       | reward          |
//! | 2 | [`BoardFeature::RowTransitions`]    | penalty         |
//! | 3 | [`BoardFeature::ColumnTransitions`] | penalty         |
//! | 4 | [`BoardFeature::Holes`]             | penalty         |
//! | 5 | [`BoardFeature::WellDepth`]         | penalty         |
//! | 6 | [`BoardFeature::MaxHeight`]         | penalty         |
//!
//! The raw measurements live in the [`source`] module.

use std::ops::Index;

use evotris_engine::{Board, PieceShape};

pub mod source;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BoardFeature {
    #[display("landing height")]
    LandingHeight,
    #[display("rows cleared")]
    RowsCleared,
    #[display("row transitions")]
    RowTransitions,
    #[display("column transitions")]
    ColumnTransitions,
    #[display("holes")]
    Holes,
    #[display("well depth")]
    WellDepth,
    #[display("max height")]
    MaxHeight,
}

impl BoardFeature {
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::LandingHeight,
        Self::RowsCleared,
        Self::RowTransitions,
        Self::ColumnTransitions,
        Self::Holes,
        Self::WellDepth,
        Self::MaxHeight,
    ];

    /// Stable identifier used in reports.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::LandingHeight => "landing_height",
            Self::RowsCleared => "rows_cleared",
            Self::RowTransitions => "row_transitions",
            Self::ColumnTransitions => "column_transitions",
            Self::Holes => "holes",
            Self::WellDepth => "well_depth",
            Self::MaxHeight => "max_height",
        }
    }

    /// Whether a larger value of this feature is desirable.
    #[must_use]
    pub const fn is_reward(self) -> bool {
        matches!(self, Self::RowsCleared)
    }
}

/// Feature measurements of a settled placement, in [`BoardFeature::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureVector([u32; BoardFeature::LEN]);

impl FeatureVector {
    #[must_use]
    pub const fn new(values: [u32; BoardFeature::LEN]) -> Self {
        Self(values)
    }

    /// Measures a board right after a placement has settled and rows were cleared.
    ///
    /// # Arguments
    ///
    /// * `board` - Board after the placement
    /// * `shape` - Geometry of the placed piece
    /// * `landing_height` - Row the piece came to rest on
    /// * `rows_cleared` - Number of rows the placement removed
    #[must_use]
    pub fn measure(
        board: &Board,
        shape: &PieceShape,
        landing_height: usize,
        rows_cleared: usize,
    ) -> Self {
        Self([
            source::landing_height(shape, landing_height),
            to_u32(rows_cleared),
            source::row_transitions(board),
            source::column_transitions(board),
            source::holes(board),
            source::well_depth(board),
            to_u32(board.max_height()),
        ])
    }

    #[must_use]
    pub fn values(&self) -> &[u32; BoardFeature::LEN] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoardFeature, u32)> + '_ {
        BoardFeature::ALL.into_iter().zip(self.0.iter().copied())
    }
}

impl Index<BoardFeature> for FeatureVector {
    type Output = u32;

    fn index(&self, feature: BoardFeature) -> &u32 {
        &self.0[feature as usize]
    }
}

pub(crate) fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
