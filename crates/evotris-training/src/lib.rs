//! Genetic optimization of heuristic weights.
//!
//! # How Training Works
//!
//! 1. **Seed** - Create a population of agents with random weights
//! 2. **Evaluate** - Each agent plays several games on a worker pool
//! 3. **Rank** - Agents are ordered by rows completed, then turns survived
//! 4. **Report** - A summary of the generation is recorded
//! 5. **Adapt** - Games get longer once the population stops spreading out
//! 6. **Breed** - The weakest agents are replaced by offspring of tournament winners
//! 7. **Repeat** - Until the configured number of generations has been reported
//!
//! # Architecture
//!
//! ```text
//! EvolutionEngine (coordinator thread)
//!     ↓ submits GameTasks to
//! WorkerPool (worker threads)
//!     ↓ returns GameOutcomes to
//! Population (ranking, breeding)
//!     ↓ summarized in
//! GenerationReport → ReportSink
//! ```
//!
//! # Example
//!
//! ```no_run
//! use evotris_training::{
//!     config::EvolutionConfig,
//!     evolution::EvolutionEngine,
//!     report::TextSink,
//! };
//!
//! let config = EvolutionConfig {
//!     generations: 10,
//!     ..EvolutionConfig::default()
//! };
//! let mut engine = EvolutionEngine::new(config, TextSink::new(std::io::stderr())).unwrap();
//! engine.run().unwrap();
//! if let Some(best) = engine.best() {
//!     println!("{}", best.weights);
//! }
//! ```

pub mod config;
pub mod evolution;
pub mod genetic;
pub mod pool;
pub mod report;
pub mod weights;
