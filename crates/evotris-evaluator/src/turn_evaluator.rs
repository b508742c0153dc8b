//! Turn evaluation: selecting the placement for the current turn.
//!
//! Every legal move is simulated with [`PlacementAnalysis`] and the settled
//! ones are scored by a [`PlacementEvaluator`]. The evaluator is greedy: it
//! looks at the immediate placement only.
//!
//! # Selection rules
//!
//! - Moves that would end the game are skipped as long as one move survives.
//! - Ties keep the earliest move in enumeration order (strict `>`), so a game
//!   replayed with the same pieces and weights picks the same moves.
//! - When every move ends the game, the first move is returned.
//!
//! # Usage
//!
//! ```
//! use evotris_engine::Game;
//! use evotris_evaluator::{turn_evaluator::TurnEvaluator, weights::Weights};
//!
//! let evaluator = TurnEvaluator::new(Weights::DEFAULT);
//! let mut game = Game::new(21, 10, 7);
//! let outcome = evaluator.play_game(&mut game, 100);
//! assert!(outcome.turns_played <= 100);
//! ```

use evotris_engine::{Board, Game, Move, PieceKind};

use crate::{
    game_task::GameOutcome, placement_analysis::PlacementAnalysis,
    placement_evaluator::PlacementEvaluator,
};

/// Picks the index of the best move in `moves`.
///
/// Returns `None` only when `moves` is empty.
///
/// # Panics
///
/// Panics if a move does not fit the board.
#[must_use]
pub fn pick_move<E>(
    board: &Board,
    piece: PieceKind,
    moves: &[Move],
    evaluator: &E,
) -> Option<usize>
where
    E: PlacementEvaluator + ?Sized,
{
    if moves.is_empty() {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for (i, &mv) in moves.iter().enumerate() {
        let PlacementAnalysis::Settled(features) = PlacementAnalysis::from_board(board, piece, mv)
        else {
            continue;
        };
        let score = evaluator.evaluate_placement(&features);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((i, score));
        }
    }

    Some(best.map_or(0, |(i, _)| i))
}

/// Plays games by picking the best move each turn.
#[derive(Debug, Clone)]
pub struct TurnEvaluator<E> {
    placement_evaluator: E,
}

impl<E> TurnEvaluator<E>
where
    E: PlacementEvaluator,
{
    #[must_use]
    pub fn new(placement_evaluator: E) -> Self {
        Self {
            placement_evaluator,
        }
    }

    /// Selects the move to make for the game's next piece.
    #[must_use]
    pub fn select_move(&self, game: &Game) -> Option<Move> {
        let moves = game.legal_moves();
        let index = pick_move(
            game.board(),
            game.next_piece(),
            &moves,
            &self.placement_evaluator,
        )?;
        Some(moves[index])
    }

    /// Plays `game` until it is lost, no move is available, or `turn_cap`
    /// turns have been played.
    pub fn play_game(&self, game: &mut Game, turn_cap: usize) -> GameOutcome {
        while game.turn() < turn_cap {
            let Some(mv) = self.select_move(game) else {
                break;
            };
            if game.make_move(mv).is_err() {
                break;
            }
        }
        GameOutcome {
            rows_cleared: game.rows_cleared(),
            turns_played: game.turn(),
        }
    }
}
