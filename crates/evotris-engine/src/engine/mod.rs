//! Game state driven by the simulation.
//!
//! - [`Game`] - Authoritative game state (board, piece stream, totals)
//! - [`PieceSource`] - Seeded random piece stream
//!
//! There is no timing, hold, rotation system or rendering: a move is an
//! orientation and a slot, and the piece drops straight down.
//!
//! # Example
//!
//! ```
//! use evotris_engine::Game;
//!
//! let mut game = Game::new(21, 10, 42);
//! while !game.has_lost() && game.turn() < 10 {
//!     let mv = game.legal_moves()[0];
//!     if game.make_move(mv).is_err() {
//!         break;
//!     }
//! }
//! println!("{} rows in {} turns", game.rows_cleared(), game.turn());
//! ```

pub use self::{game::*, piece_source::*};

mod game;
mod piece_source;
