//! Weight vector operations for the genetic algorithm.
//!
//! These operators are used by [`evolution::EvolutionEngine`](crate::evolution::EvolutionEngine)
//! to seed the first generation and to breed offspring.
//!
//! # Operations
//!
//! - **Initialization**: [`random`] draws each weight from [`seed_range`]
//! - **Crossover**: [`crossover`] averages two parents, weighted by their survival
//! - **Mutation**: [`Mutation`] rescales a single weight
//!
//! Offspring are L1-normalized with [`Weights::normalize_l1`] after mutation.

use std::ops::RangeInclusive;

use evotris_evaluator::{board_feature::BoardFeature, weights::Weights};
use rand::Rng;
use rand_distr::Uniform;

use crate::config::ConfigError;

/// Creates a weight vector by applying a function to each feature.
pub fn from_fn<F>(mut f: F) -> Weights
where
    F: FnMut(BoardFeature) -> f64,
{
    Weights::from_array(BoardFeature::ALL.map(&mut f))
}

/// Range initial weights are drawn from.
///
/// Rewards start non-negative and penalties non-positive.
#[must_use]
pub fn seed_range(feature: BoardFeature) -> RangeInclusive<f64> {
    if feature.is_reward() {
        0.0..=1.0
    } else {
        -1.0..=0.0
    }
}

/// Generates an L1-normalized random weight vector.
pub fn random<R>(rng: &mut R) -> Weights
where
    R: Rng + ?Sized,
{
    from_fn(|feature| rng.random_range(seed_range(feature))).normalized_l1()
}

/// Blends two parents component-wise.
///
/// Each component is the average of the parents' components weighted by
/// `fitness1` and `fitness2`. When both are zero the plain average is used.
/// The result is not normalized.
///
/// # Arguments
///
/// * `p1`, `p2` - Parent weights
/// * `fitness1`, `fitness2` - Turns played by each parent
#[must_use]
pub fn crossover(p1: &Weights, fitness1: f64, p2: &Weights, fitness2: f64) -> Weights {
    let total = fitness1 + fitness2;
    let (a, b) = if total > 0.0 {
        (fitness1 / total, fitness2 / total)
    } else {
        (0.5, 0.5)
    };
    from_fn(|feature| a * p1[feature] + b * p2[feature])
}

/// Single-component multiplicative mutation.
///
/// With probability `rate`, one uniformly chosen component is multiplied by a
/// factor drawn from `[1 - delta, 1 + delta]`.
#[derive(Debug, Clone)]
pub struct Mutation {
    rate: f64,
    factor: Uniform<f64>,
}

impl Mutation {
    pub fn new(rate: f64, delta: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::OutOfUnitRange {
                name: "mutation rate",
                value: rate,
            });
        }
        let factor = Uniform::new_inclusive(1.0 - delta, 1.0 + delta).map_err(|_| {
            ConfigError::OutOfUnitRange {
                name: "mutation delta",
                value: delta,
            }
        })?;
        Ok(Self { rate, factor })
    }

    /// Mutates `weights` in place. Returns whether a component changed.
    pub fn apply<R>(&self, weights: &mut Weights, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        if !rng.random_bool(self.rate) {
            return false;
        }
        let values = weights.as_mut_slice();
        let i = rng.random_range(0..values.len());
        values[i] *= rng.sample(&self.factor);
        true
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_random_honors_sign_conventions() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            let w = random(&mut rng);
            assert!((w.l1_norm() - 1.0).abs() < EPS);
            for (feature, value) in w.iter() {
                if feature.is_reward() {
                    assert!(value >= 0.0, "{feature}: {value}");
                } else {
                    assert!(value <= 0.0, "{feature}: {value}");
                }
            }
        }
    }

    #[test]
    fn test_crossover_weights_by_fitness() {
        let p1 = Weights::only(BoardFeature::Holes, -1.0);
        let p2 = Weights::only(BoardFeature::Holes, -0.5);

        let child = crossover(&p1, 30.0, &p2, 10.0);
        assert!((child[BoardFeature::Holes] - (-0.875)).abs() < EPS);

        let child = crossover(&p1, 0.0, &p2, 0.0);
        assert!((child[BoardFeature::Holes] - (-0.75)).abs() < EPS);

        let child = crossover(&p1, 0.0, &p2, 5.0);
        assert!((child[BoardFeature::Holes] - (-0.5)).abs() < EPS);
    }

    #[test]
    fn test_crossover_then_normalize() {
        let mut rng = Pcg32::seed_from_u64(2);
        let p1 = random(&mut rng);
        let p2 = random(&mut rng);
        let child = crossover(&p1, 120.0, &p2, 80.0).normalized_l1();
        assert_eq!(child.as_array().len(), BoardFeature::LEN);
        assert!((child.l1_norm() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_mutation_changes_one_component() {
        let mut rng = Pcg32::seed_from_u64(3);
        let always = Mutation::new(1.0, 0.2).unwrap();
        let never = Mutation::new(0.0, 0.2).unwrap();
        let base = Weights::from_array([-1.0, 1.0, -1.0, -1.0, -1.0, -1.0, -1.0]);

        for _ in 0..100 {
            let mut w = base;
            assert!(always.apply(&mut w, &mut rng));
            let changed: Vec<_> = base
                .as_array()
                .iter()
                .zip(w.as_array())
                .filter(|(a, b)| a != b)
                .map(|(a, b)| b / a)
                .collect();
            assert!(changed.len() <= 1);
            for factor in changed {
                assert!((0.8 - EPS..=1.2 + EPS).contains(&factor), "{factor}");
            }

            let mut w = base;
            assert!(!never.apply(&mut w, &mut rng));
            assert_eq!(w, base);
        }
    }

    #[test]
    fn test_mutation_rejects_bad_parameters() {
        assert!(Mutation::new(1.5, 0.2).is_err());
        assert!(Mutation::new(0.5, f64::NAN).is_err());
        assert!(Mutation::new(0.5, 0.0).is_ok());
    }
}
