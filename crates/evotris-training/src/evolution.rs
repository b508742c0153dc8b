//! The generation state machine.
//!
//! ```text
//! Seed → Evaluate → Rank → Report → AdaptDepth → Breed ─┐
//!           ↑                  │                         │
//!           │                  └→ Done (last generation) │
//!           └────────────────────────────────────────────┘
//! ```
//!
//! - **Seed** - Random initial population
//! - **Evaluate** - Every agent plays `games_per_agent` games on the worker
//!   pool; results are folded into the agents as they complete
//! - **Rank** - Stable ascending sort by fitness, fittest last
//! - **Report** - Summary recorded to the [`ReportSink`]
//! - **AdaptDepth** - Double the turn cap when the top agents no longer stand
//!   out from the population
//! - **Breed** - Replace the lowest-ranked agents with offspring and reset
//!   every agent's statistics
//!
//! All phases run on the thread that calls [`EvolutionEngine::step`]; only
//! the games themselves run on worker threads. Piece seeds for the games are
//! drawn from the engine's RNG in submission order, so a run with a fixed
//! seed is reproducible regardless of the worker count.

use std::io;

use evotris_evaluator::{
    game_task::{GameOutcome, GameTask},
    weights::Weights,
};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    config::{ConfigError, EvolutionConfig},
    genetic::{Agent, Population},
    pool::{Completion, PoolError, WorkerPool},
    report::{AgentSummary, GenerationReport, ReportSink},
    weights::Mutation,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Phase {
    Seed,
    Evaluate,
    Rank,
    Report,
    AdaptDepth,
    Breed,
    Done,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum EvolutionError {
    #[display("invalid configuration")]
    Config { source: ConfigError },
    #[display("worker pool failure")]
    Pool { source: PoolError },
    #[display("failed to record generation report")]
    Report { source: io::Error },
}

/// Relative lead of the top agents over the population average.
///
/// Returns `None` when the top average is not positive, in which case the
/// lead is undefined.
#[must_use]
pub fn top_lead(top_average: f64, population_average: f64) -> Option<f64> {
    (top_average > 0.0).then(|| (top_average - population_average) / top_average)
}

/// Game counts of one Evaluate phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    completed: usize,
    failed: usize,
}

/// Folds finished games into the agents they were played for.
///
/// A failed game is logged and leaves its agent's totals untouched.
fn record_completions<I>(agents: &mut [Agent], completions: I) -> Tally
where
    I: IntoIterator<Item = Completion<GameOutcome>>,
{
    let mut tally = Tally::default();
    for completion in completions {
        match completion.result {
            Ok(outcome) => {
                agents[completion.tag].record(outcome);
                tally.completed += 1;
            }
            Err(e) => {
                tracing::warn!(agent = completion.tag, "game dropped: {e}");
                tally.failed += 1;
            }
        }
    }
    tally
}

#[derive(Debug)]
pub struct EvolutionEngine<S> {
    config: EvolutionConfig,
    mutation: Mutation,
    rng: Pcg32,
    pool: WorkerPool<GameOutcome>,
    sink: S,
    phase: Phase,
    generation: usize,
    turn_cap: usize,
    population: Population,
    failed_tasks: usize,
    last_report: Option<GenerationReport>,
}

impl<S> EvolutionEngine<S>
where
    S: ReportSink,
{
    /// Validates `config` and starts the worker pool.
    pub fn new(config: EvolutionConfig, sink: S) -> Result<Self, EvolutionError> {
        config.validate()?;
        let mutation = Mutation::new(config.mutation_rate, config.mutation_delta)?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        tracing::info!(seed, "optimizer seeded");
        let pool = WorkerPool::new(config.workers)?;
        Ok(Self {
            turn_cap: config.initial_turn_cap,
            config,
            mutation,
            rng: Pcg32::seed_from_u64(seed),
            pool,
            sink,
            phase: Phase::Seed,
            generation: 0,
            population: Population::new(vec![]),
            failed_tasks: 0,
            last_report: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Zero-based index of the current generation.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Turn cap for the games of the current generation.
    #[must_use]
    pub fn turn_cap(&self) -> usize {
        self.turn_cap
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn last_report(&self) -> Option<&GenerationReport> {
        self.last_report.as_ref()
    }

    /// Fittest agent of the most recently reported generation.
    #[must_use]
    pub fn best(&self) -> Option<&AgentSummary> {
        self.last_report.as_ref().and_then(GenerationReport::best)
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Runs the current phase and moves to the next one.
    ///
    /// Returns the new phase. Does nothing once [`Phase::Done`] is reached.
    pub fn step(&mut self) -> Result<Phase, EvolutionError> {
        tracing::debug!(generation = self.generation, phase = %self.phase, "step");
        self.phase = match self.phase {
            Phase::Seed => {
                self.seed();
                Phase::Evaluate
            }
            Phase::Evaluate => {
                self.evaluate()?;
                Phase::Rank
            }
            Phase::Rank => {
                self.population.rank();
                Phase::Report
            }
            Phase::Report => {
                self.report()?;
                if self.generation + 1 >= self.config.generations {
                    self.pool.shutdown();
                    Phase::Done
                } else {
                    Phase::AdaptDepth
                }
            }
            Phase::AdaptDepth => {
                self.adapt_depth();
                Phase::Breed
            }
            Phase::Breed => {
                self.breed();
                Phase::Evaluate
            }
            Phase::Done => Phase::Done,
        };
        Ok(self.phase)
    }

    /// Steps until [`Phase::Done`] and returns the final ranked population.
    pub fn run(&mut self) -> Result<&Population, EvolutionError> {
        while !self.phase.is_done() {
            self.step()?;
        }
        Ok(&self.population)
    }

    fn seed(&mut self) {
        self.population = Population::random(self.config.population_size, &mut self.rng);
        if self.config.seed_with_default
            && let Some(agent) = self.population.agents_mut().first_mut()
        {
            *agent = Agent::new(Weights::DEFAULT);
        }
        tracing::debug!(
            agents = self.population.len(),
            with_default = self.config.seed_with_default,
            "population seeded"
        );
    }

    fn evaluate(&mut self) -> Result<(), EvolutionError> {
        let total = self.config.tasks_per_generation();
        for (index, agent) in self.population.agents().iter().enumerate() {
            for _ in 0..self.config.games_per_agent {
                let task = GameTask {
                    weights: *agent.weights(),
                    board_rows: self.config.board_rows,
                    board_cols: self.config.board_cols,
                    turn_cap: self.turn_cap,
                    seed: self.rng.random(),
                };
                self.pool.submit(index, move || task.run())?;
            }
        }

        let tally = record_completions(self.population.agents_mut(), self.pool.drain());
        self.finish_evaluation(total, tally);
        Ok(())
    }

    fn finish_evaluation(&mut self, total: usize, tally: Tally) {
        // Tasks lost to a disconnected pool never report back.
        self.failed_tasks = total - tally.completed;
        if self.failed_tasks > tally.failed {
            tracing::warn!(
                lost = self.failed_tasks - tally.failed,
                "games lost without a result"
            );
        }
        tracing::debug!(
            completed = tally.completed,
            failed = self.failed_tasks,
            "generation evaluated"
        );
    }

    fn report(&mut self) -> Result<(), EvolutionError> {
        let report = GenerationReport::from_population(
            self.generation,
            self.turn_cap,
            &self.population,
            self.config.report_top_k,
            self.failed_tasks,
        );
        self.sink.record(&report)?;
        if let Some(best) = report.best() {
            tracing::info!(
                generation = self.generation,
                turn_cap = self.turn_cap,
                best_rows = best.rows_completed,
                best_average = best.average_rows,
                population_average = report.population_average,
                "generation complete"
            );
        }
        self.last_report = Some(report);
        Ok(())
    }

    fn adapt_depth(&mut self) {
        let top = self.population.top_average_rows(self.config.report_top_k);
        let average = self.population.average_rows();
        match top_lead(top, average) {
            None => {
                tracing::debug!("top agents cleared no rows; turn cap unchanged");
            }
            Some(lead) if lead < self.config.deepen_threshold => {
                self.turn_cap = self.turn_cap.saturating_mul(2);
                tracing::info!(
                    lead,
                    turn_cap = self.turn_cap,
                    "population converged; deepening games"
                );
            }
            Some(_) => {}
        }
    }

    fn breed(&mut self) {
        self.population.breed(
            self.config.cull_count(),
            self.config.tournament_size(),
            &self.mutation,
            &mut self.rng,
        );
        self.population.reset_stats();
        self.generation += 1;
    }
}
