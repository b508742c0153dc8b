//! Agents, populations and the genetic operators applied to them.
//!
//! # Key Components
//!
//! - [`Agent`] - A weight vector plus the game totals it earned this generation
//! - [`Population`] - Fixed-size collection of agents, ranked in place
//!
//! # Ranking
//!
//! Agents are compared by a single key, [`Agent::fitness_key`]: total rows
//! completed, then total turns played. [`Population::rank`] sorts ascending
//! with a stable sort, so the fittest agents sit at the end and agents with
//! equal keys keep their previous relative order.
//!
//! # Breeding
//!
//! [`Population::breed`] replaces the `cull_count` lowest-ranked agents. Each
//! replacement is bred from two parents picked by [`tournament_select`] over
//! the whole ranked population as it stood before any replacement:
//!
//! 1. **Tournament** - Sample a subset without replacement and take its two fittest
//! 2. **Crossover** - Average the parents weighted by turns played
//! 3. **Mutation** - Maybe rescale one component
//! 4. **Normalization** - L1-normalize the child

use evotris_evaluator::{board_feature::BoardFeature, game_task::GameOutcome, weights::Weights};
use rand::{Rng, seq::IndexedRandom};

use crate::weights::{self, Mutation};

/// A candidate weight vector and its statistics for the current generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    weights: Weights,
    rows_completed: usize,
    turns_played: usize,
    games_played: usize,
}

impl Agent {
    #[must_use]
    pub fn new(weights: Weights) -> Self {
        Self {
            weights,
            rows_completed: 0,
            turns_played: 0,
            games_played: 0,
        }
    }

    /// Creates an agent with random weights.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(weights::random(rng))
    }

    #[must_use]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    #[must_use]
    pub fn rows_completed(&self) -> usize {
        self.rows_completed
    }

    #[must_use]
    pub fn turns_played(&self) -> usize {
        self.turns_played
    }

    #[must_use]
    pub fn games_played(&self) -> usize {
        self.games_played
    }

    /// Ordering key shared by every ranking and selection step.
    #[must_use]
    pub fn fitness_key(&self) -> (usize, usize) {
        (self.rows_completed, self.turns_played)
    }

    /// Mean rows cleared per completed game, 0 before any game completes.
    #[must_use]
    pub fn average_rows(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        #[expect(clippy::cast_precision_loss)]
        let avg = self.rows_completed as f64 / self.games_played as f64;
        avg
    }

    pub fn record(&mut self, outcome: GameOutcome) {
        self.rows_completed += outcome.rows_cleared;
        self.turns_played += outcome.turns_played;
        self.games_played += 1;
    }

    pub fn reset_stats(&mut self) {
        self.rows_completed = 0;
        self.turns_played = 0;
        self.games_played = 0;
    }
}

/// Minimum, mean and maximum of one weight across a population.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct WeightSpread {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    agents: Vec<Agent>,
}

impl Population {
    #[must_use]
    pub fn new(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    /// Creates `count` agents with random weights.
    pub fn random<R>(count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new((0..count).map(|_| Agent::random(rng)).collect())
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Stable-sorts agents ascending by [`Agent::fitness_key`].
    pub fn rank(&mut self) {
        self.agents.sort_by_key(Agent::fitness_key);
    }

    #[must_use]
    pub fn is_ranked(&self) -> bool {
        self.agents.is_sorted_by_key(Agent::fitness_key)
    }

    /// The fittest agent of a ranked population.
    #[must_use]
    pub fn best(&self) -> Option<&Agent> {
        self.agents.last()
    }

    /// The `k` fittest agents of a ranked population, best first.
    pub fn top(&self, k: usize) -> impl Iterator<Item = &Agent> {
        self.agents.iter().rev().take(k)
    }

    /// Mean of [`Agent::average_rows`] over all agents.
    #[must_use]
    pub fn average_rows(&self) -> f64 {
        mean(self.agents.iter().map(Agent::average_rows))
    }

    /// Mean of [`Agent::average_rows`] over the `k` fittest agents.
    #[must_use]
    pub fn top_average_rows(&self, k: usize) -> f64 {
        mean(self.top(k).map(Agent::average_rows))
    }

    pub fn reset_stats(&mut self) {
        for agent in &mut self.agents {
            agent.reset_stats();
        }
    }

    /// Spread of each weight across the population, in [`BoardFeature::ALL`] order.
    #[must_use]
    pub fn weight_spread(&self) -> Vec<WeightSpread> {
        BoardFeature::ALL
            .iter()
            .map(|&feature| {
                let values = self.agents.iter().map(|agent| agent.weights[feature]);
                WeightSpread {
                    min: values.clone().fold(f64::INFINITY, f64::min),
                    mean: mean(values.clone()),
                    max: values.fold(f64::NEG_INFINITY, f64::max),
                }
            })
            .collect()
    }

    /// Replaces the `cull_count` lowest-ranked agents with offspring.
    ///
    /// # Arguments
    ///
    /// * `cull_count` - Number of agents to replace
    /// * `tournament_size` - Agents sampled per parent tournament
    /// * `mutation` - Mutation applied to each child
    /// * `rng` - Random number generator
    ///
    /// # Panics
    ///
    /// Panics if the population is not ranked, or if `tournament_size` is not
    /// in `2..=len`.
    pub fn breed<R>(
        &mut self,
        cull_count: usize,
        tournament_size: usize,
        mutation: &Mutation,
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        assert!(self.is_ranked());
        let parents_pool = self.agents.clone();
        for slot in self.agents.iter_mut().take(cull_count) {
            let (p1, p2) = tournament_select(&parents_pool, tournament_size, rng);
            #[expect(clippy::cast_precision_loss)]
            let mut child = weights::crossover(
                &p1.weights,
                p1.turns_played as f64,
                &p2.weights,
                p2.turns_played as f64,
            );
            mutation.apply(&mut child, rng);
            child.normalize_l1();
            *slot = Agent::new(child);
        }
    }
}

/// Picks two parents by tournament selection.
///
/// Samples `tournament_size` distinct agents, ranks them by
/// [`Agent::fitness_key`] and returns the fittest two, fittest first.
///
/// # Panics
///
/// Panics if `tournament_size` is not in `2..=population.len()`.
pub fn tournament_select<'a, R>(
    population: &'a [Agent],
    tournament_size: usize,
    rng: &mut R,
) -> (&'a Agent, &'a Agent)
where
    R: Rng + ?Sized,
{
    assert!(
        (2..=population.len()).contains(&tournament_size),
        "tournament size {tournament_size} out of range for {} agents",
        population.len()
    );
    let mut subset: Vec<&Agent> = population.choose_multiple(rng, tournament_size).collect();
    subset.sort_by_key(|agent| agent.fitness_key());
    let n = subset.len();
    (subset[n - 1], subset[n - 2])
}

fn mean<I>(values: I) -> f64
where
    I: Iterator<Item = f64>,
{
    let (sum, count) = values.fold((0.0, 0_u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}
