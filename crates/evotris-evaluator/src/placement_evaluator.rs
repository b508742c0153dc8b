//! Placement evaluation: scoring individual piece placements.
//!
//! A placement is scored as a linear combination of its features:
//!
//! ```text
//! score = w₀·f₀ + w₁·f₁ + ... + w₆·f₆
//! ```
//!
//! where `fᵢ` is the raw feature value from [`FeatureVector`] and `wᵢ` the
//! matching entry of [`Weights`]. Higher scores are better.

use std::fmt;

use crate::{board_feature::FeatureVector, weights::Weights};

/// Evaluates piece placements by assigning scores.
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    /// Evaluates a settled placement and returns a score (higher is better).
    fn evaluate_placement(&self, features: &FeatureVector) -> f64;
}

impl PlacementEvaluator for Weights {
    fn evaluate_placement(&self, features: &FeatureVector) -> f64 {
        score(features, self)
    }
}

/// Weighted sum of `features`.
#[must_use]
pub fn score(features: &FeatureVector, weights: &Weights) -> f64 {
    features
        .values()
        .iter()
        .zip(weights.as_array())
        .map(|(&f, &w)| f64::from(f) * w)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_feature::BoardFeature;

    #[test]
    fn test_score_is_dot_product() {
        let features = FeatureVector::new([1, 2, 3, 4, 5, 6, 7]);
        let weights = Weights::from_array([1.0, -1.0, 0.5, 0.0, 2.0, 0.0, -0.25]);
        assert!((score(&features, &weights) - (1.0 - 2.0 + 1.5 + 10.0 - 1.75)).abs() < 1e-12);
        assert!(
            (weights.evaluate_placement(&features) - score(&features, &weights)).abs() < 1e-12
        );
    }

    #[test]
    fn test_single_feature_weights() {
        let features = FeatureVector::new([9, 1, 9, 9, 9, 9, 9]);
        let weights = Weights::only(BoardFeature::RowsCleared, 1.0);
        assert!((score(&features, &weights) - 1.0).abs() < 1e-12);
    }
}
