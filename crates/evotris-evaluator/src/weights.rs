//! Heuristic weight vectors.
//!
//! A [`Weights`] value holds one coefficient per [`BoardFeature`], in
//! [`BoardFeature::ALL`] order. Weights produced by the optimizer are
//! L1-normalized: the absolute values sum to 1.0.

use std::{fmt, ops::Index};

use crate::board_feature::BoardFeature;

/// Weight vector given to [`Weights::new`] has the wrong number of entries.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("expected {expected} weights, got {actual}")]
pub struct WeightsLengthError {
    pub expected: usize,
    pub actual: usize,
}

/// One coefficient per board feature.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Weights([f64; BoardFeature::LEN]);

impl Default for Weights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Weights {
    /// Built-in weights used when no valid vector is supplied.
    ///
    /// Dellacherie's hand-tuned coefficients, L1-normalized. Max height is not
    /// part of his feature set and carries no weight.
    pub const DEFAULT: Self = Self([
        -0.141_646_855_3,
        0.107_587_496_7,
        -0.101_287_484_9,
        -0.294_263_359_5,
        -0.248_634_883_6,
        -0.106_579_920_0,
        0.0,
    ]);

    /// Weights that are zero except for `feature`.
    #[must_use]
    pub fn only(feature: BoardFeature, value: f64) -> Self {
        let mut values = [0.0; BoardFeature::LEN];
        values[feature as usize] = value;
        Self(values)
    }

    #[must_use]
    pub const fn from_array(values: [f64; BoardFeature::LEN]) -> Self {
        Self(values)
    }

    pub fn new(values: Vec<f64>) -> Result<Self, WeightsLengthError> {
        Self::try_from_slice(&values)
    }

    pub fn try_from_slice(values: &[f64]) -> Result<Self, WeightsLengthError> {
        let values = <[f64; BoardFeature::LEN]>::try_from(values).map_err(|_| {
            WeightsLengthError {
                expected: BoardFeature::LEN,
                actual: values.len(),
            }
        })?;
        Ok(Self(values))
    }

    /// Like [`Self::new`], but falls back to [`Self::DEFAULT`] on a length mismatch.
    #[must_use]
    pub fn from_values_or_default(values: &[f64]) -> Self {
        Self::try_from_slice(values).unwrap_or_else(|e| {
            tracing::warn!("{e}; using default weights");
            Self::DEFAULT
        })
    }

    /// Parses one weight per argument, falling back to [`Self::DEFAULT`] when
    /// any entry is not a number or the count is wrong.
    #[must_use]
    pub fn parse_or_default<S>(args: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        let parsed: Result<Vec<f64>, _> = args.iter().map(|s| s.as_ref().trim().parse()).collect();
        match parsed {
            Ok(values) => Self::from_values_or_default(&values),
            Err(e) => {
                tracing::warn!("invalid weight: {e}; using default weights");
                Self::DEFAULT
            }
        }
    }

    #[must_use]
    pub fn as_array(&self) -> &[f64; BoardFeature::LEN] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoardFeature, f64)> + '_ {
        BoardFeature::ALL.into_iter().zip(self.0.iter().copied())
    }

    /// Sum of absolute values.
    #[must_use]
    pub fn l1_norm(&self) -> f64 {
        self.0.iter().map(|w| w.abs()).sum()
    }

    /// Scales the vector so its absolute values sum to 1.0.
    ///
    /// An all-zero vector is left unchanged.
    pub fn normalize_l1(&mut self) {
        let norm = self.l1_norm();
        if norm > 0.0 {
            for w in &mut self.0 {
                *w /= norm;
            }
        }
    }

    #[must_use]
    pub fn normalized_l1(mut self) -> Self {
        self.normalize_l1();
        self
    }
}

impl Index<BoardFeature> for Weights {
    type Output = f64;

    fn index(&self, feature: BoardFeature) -> &f64 {
        &self.0[feature as usize]
    }
}

/// Comma-separated, in the format accepted by [`Weights::parse_or_default`].
impl fmt::Display for Weights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, w) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{w}")?;
        }
        Ok(())
    }
}
