//! Move simulation and heuristic move selection.
//!
//! This crate turns a weight vector into a playing agent:
//!
//! 1. **Placement Analysis** ([`placement_analysis`]) - Simulates one placement on a copy of
//!    the board and measures the resulting [`board_feature`]s.
//!
//! 2. **Placement Evaluation** ([`placement_evaluator`]) - Scores a settled placement as the
//!    weighted sum of its features.
//!
//! 3. **Turn Evaluation** ([`turn_evaluator`]) - Picks the best legal move for the current
//!    piece and plays whole games with it.
//!
//! 4. **Game Task** ([`game_task`]) - One owned, reproducible game, ready to run on a worker
//!    thread.
//!
//! # Architecture
//!
//! ```text
//! Game Task (one game, one weight vector)
//!     ↓ uses
//! Turn Evaluation (select best move)
//!     ↓ uses
//! Placement Evaluation (score single placement)
//!     ↓ uses
//! Placement Analysis (simulate and measure)
//! ```
//!
//! # Example
//!
//! ```
//! use evotris_evaluator::{game_task::GameTask, weights::Weights};
//!
//! let outcome = GameTask::new(Weights::DEFAULT, 50, 1).run();
//! println!("{} rows in {} turns", outcome.rows_cleared, outcome.turns_played);
//! ```

pub mod board_feature;
pub mod game_task;
pub mod placement_analysis;
pub mod placement_evaluator;
pub mod turn_evaluator;
pub mod weights;
