//! Board and piece geometry for the weight-tuning simulator.
//!
//! - [`Board`] - Turn-stamped cell grid with cached column heights
//! - [`PieceKind`] / [`PieceShape`] - The seven pieces and their per-orientation profiles
//! - [`Move`] / [`legal_moves`] - Placement choices and their enumeration order
//! - [`Game`] - A single game: board, seeded piece stream and totals

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum MoveError {
    #[display("move {mv} does not fit piece {piece}")]
    Illegal { mv: Move, piece: PieceKind },
    #[display("piece does not fit below the top of the board")]
    GameOver,
    #[display("game is already over")]
    GameAlreadyOver,
}
