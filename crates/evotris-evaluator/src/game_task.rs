//! A single game played for one weight vector.
//!
//! [`GameTask`] is a self-contained, owned description of a game: it carries
//! its own copy of the weights and the piece seed, so it can be moved into a
//! worker thread and replayed exactly.

use evotris_engine::{DEFAULT_COLS, DEFAULT_ROWS, Game};

use crate::{turn_evaluator::TurnEvaluator, weights::Weights};

/// Totals of one finished game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct GameOutcome {
    pub rows_cleared: usize,
    pub turns_played: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameTask {
    pub weights: Weights,
    pub board_rows: usize,
    pub board_cols: usize,
    pub turn_cap: usize,
    pub seed: u64,
}

impl GameTask {
    /// Task on the default board size.
    #[must_use]
    pub fn new(weights: Weights, turn_cap: usize, seed: u64) -> Self {
        Self {
            weights,
            board_rows: DEFAULT_ROWS,
            board_cols: DEFAULT_COLS,
            turn_cap,
            seed,
        }
    }

    /// Plays the game to completion.
    #[must_use]
    pub fn run(self) -> GameOutcome {
        let mut game = Game::new(self.board_rows, self.board_cols, self.seed);
        let evaluator = TurnEvaluator::new(self.weights);
        evaluator.play_game(&mut game, self.turn_cap)
    }
}
