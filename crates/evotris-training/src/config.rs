//! Optimizer configuration.
//!
//! [`EvolutionConfig`] is deserialized from JSON with every field optional;
//! missing fields take the values of [`EvolutionConfig::default`]. Call
//! [`EvolutionConfig::validate`] before use.

use std::thread;

use evotris_engine::{MAX_COLS, MIN_COLS};
use evotris_evaluator::board_feature::BoardFeature;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population must hold at least 2 agents, got {size}")]
    PopulationTooSmall { size: usize },
    #[display("games per agent must be at least 1")]
    NoGames,
    #[display("worker count must be at least 1")]
    NoWorkers,
    #[display("generation count must be at least 1")]
    NoGenerations,
    #[display("initial turn cap must be at least 1")]
    NoTurns,
    #[display("{name} must be in [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },
    #[display("deepen threshold must be finite, got {value}")]
    NonFiniteThreshold { value: f64 },
    #[display("feature count must be {expected}, got {actual}")]
    FeatureCount { expected: usize, actual: usize },
    #[display("report top-k must be in 1..={population}, got {top_k}")]
    TopK { top_k: usize, population: usize },
    #[display(
        "board must have at least 1 row and {}..={} columns, got {rows}x{cols}",
        MIN_COLS,
        MAX_COLS
    )]
    BoardSize { rows: usize, cols: usize },
}

/// Parameters of one optimization run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvolutionConfig {
    /// Number of agents per generation
    pub population_size: usize,
    /// Games each agent plays per generation
    pub games_per_agent: usize,
    /// Worker threads running games
    pub workers: usize,
    /// Probability that an offspring gets one weight perturbed
    pub mutation_rate: f64,
    /// Relative size of a mutation: the weight is scaled by a factor in `[1 - δ, 1 + δ]`
    pub mutation_delta: f64,
    /// Fraction of the ranked population replaced each generation
    pub culling_fraction: f64,
    /// Fraction of the population sampled for each parent tournament
    pub selection_fraction: f64,
    /// Relative gap between the top agents and the population average below
    /// which the turn cap doubles
    pub deepen_threshold: f64,
    pub initial_turn_cap: usize,
    pub feature_count: usize,
    pub generations: usize,
    /// Agents listed in each generation report
    pub report_top_k: usize,
    pub board_rows: usize,
    pub board_cols: usize,
    /// Seed for the optimizer's RNG; random when absent
    pub seed: Option<u64>,
    /// Start the first generation with one agent holding the default weights
    pub seed_with_default: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            games_per_agent: 5,
            workers: default_workers(),
            mutation_rate: 0.05,
            mutation_delta: 0.2,
            culling_fraction: 0.3,
            selection_fraction: 0.1,
            deepen_threshold: 0.1,
            initial_turn_cap: 500,
            feature_count: BoardFeature::LEN,
            generations: 50,
            report_top_k: 5,
            board_rows: evotris_engine::DEFAULT_ROWS,
            board_cols: evotris_engine::DEFAULT_COLS,
            seed: None,
            seed_with_default: false,
        }
    }
}

/// Number of hardware threads, or 1 when it cannot be determined.
#[must_use]
pub fn default_workers() -> usize {
    thread::available_parallelism().map_or(1, usize::from)
}

impl EvolutionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall {
                size: self.population_size,
            });
        }
        if self.games_per_agent == 0 {
            return Err(ConfigError::NoGames);
        }
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if self.initial_turn_cap == 0 {
            return Err(ConfigError::NoTurns);
        }
        for (name, value) in [
            ("mutation rate", self.mutation_rate),
            ("mutation delta", self.mutation_delta),
            ("culling fraction", self.culling_fraction),
            ("selection fraction", self.selection_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { name, value });
            }
        }
        if !self.deepen_threshold.is_finite() {
            return Err(ConfigError::NonFiniteThreshold {
                value: self.deepen_threshold,
            });
        }
        if self.feature_count != BoardFeature::LEN {
            return Err(ConfigError::FeatureCount {
                expected: BoardFeature::LEN,
                actual: self.feature_count,
            });
        }
        if self.report_top_k == 0 || self.report_top_k > self.population_size {
            return Err(ConfigError::TopK {
                top_k: self.report_top_k,
                population: self.population_size,
            });
        }
        if self.board_rows == 0 || !(MIN_COLS..=MAX_COLS).contains(&self.board_cols) {
            return Err(ConfigError::BoardSize {
                rows: self.board_rows,
                cols: self.board_cols,
            });
        }
        Ok(())
    }

    /// Number of agents replaced each generation.
    #[must_use]
    pub fn cull_count(&self) -> usize {
        fraction_of(self.culling_fraction, self.population_size)
    }

    /// Number of agents sampled for each parent tournament (at least 2).
    #[must_use]
    pub fn tournament_size(&self) -> usize {
        fraction_of(self.selection_fraction, self.population_size)
            .max(2)
            .min(self.population_size)
    }

    /// Number of games played per generation.
    #[must_use]
    pub fn tasks_per_generation(&self) -> usize {
        self.population_size * self.games_per_agent
    }
}

#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn fraction_of(fraction: f64, count: usize) -> usize {
    ((fraction * count as f64).floor() as usize).min(count)
}
