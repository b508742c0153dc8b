use arrayvec::ArrayVec;

use crate::{
    MoveError,
    core::{
        board::{Board, Placement},
        piece::{self, MAX_LEGAL_MOVES, Move, PieceKind},
    },
};

use super::piece_source::PieceSource;

/// Authoritative state of one game.
///
/// Owns the board, the piece stream and the running totals. A game ends when
/// a move cannot settle below the top of the board; after that every move is
/// rejected.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    pieces: PieceSource,
    next_piece: PieceKind,
    turn: usize,
    rows_cleared: usize,
    lost: bool,
}

impl Game {
    /// Creates a game on an empty `rows × cols` board with a seeded piece stream.
    #[must_use]
    pub fn new(rows: usize, cols: usize, seed: u64) -> Self {
        Self::with_source(rows, cols, PieceSource::with_seed(seed))
    }

    #[must_use]
    pub fn with_source(rows: usize, cols: usize, mut pieces: PieceSource) -> Self {
        let next_piece = pieces.pop_next();
        Self {
            board: Board::new(rows, cols),
            pieces,
            next_piece,
            turn: 0,
            rows_cleared: 0,
            lost: false,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The piece the next move will place.
    #[must_use]
    pub fn next_piece(&self) -> PieceKind {
        self.next_piece
    }

    /// Number of moves made, including the one that lost the game.
    #[must_use]
    pub fn turn(&self) -> usize {
        self.turn
    }

    #[must_use]
    pub fn rows_cleared(&self) -> usize {
        self.rows_cleared
    }

    #[must_use]
    pub fn has_lost(&self) -> bool {
        self.lost
    }

    /// Enumerates the legal moves for the next piece. Empty once the game is lost.
    #[must_use]
    pub fn legal_moves(&self) -> ArrayVec<Move, MAX_LEGAL_MOVES> {
        if self.lost {
            return ArrayVec::new();
        }
        piece::legal_moves(self.next_piece, self.board.cols())
    }

    /// Places the next piece and draws a new one.
    ///
    /// Returns the number of rows cleared by the move.
    pub fn make_move(&mut self, mv: Move) -> Result<usize, MoveError> {
        if self.lost {
            return Err(MoveError::GameAlreadyOver);
        }
        let piece = self.next_piece;
        if !mv.is_legal(piece, self.board.cols()) {
            return Err(MoveError::Illegal { mv, piece });
        }

        self.turn += 1;
        match self.board.place(piece, mv) {
            Placement::Settled { rows_cleared, .. } => {
                self.rows_cleared += rows_cleared;
                self.next_piece = self.pieces.pop_next();
                Ok(rows_cleared)
            }
            Placement::GameOver => {
                self.lost = true;
                Err(MoveError::GameOver)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_game() {
        let mut a = Game::new(21, 10, 99);
        let mut b = Game::new(21, 10, 99);
        for _ in 0..50 {
            assert_eq!(a.next_piece(), b.next_piece());
            let mv = a.legal_moves()[0];
            let ra = a.make_move(mv);
            let rb = b.make_move(mv);
            assert_eq!(ra.is_ok(), rb.is_ok());
            if ra.is_err() {
                break;
            }
        }
        assert_eq!(a.board(), b.board());
        assert_eq!(a.turn(), b.turn());
    }

    #[test]
    fn test_losing_move_counts_as_turn() {
        let mut game = Game::new(1, 10, 3);
        let mv = game.legal_moves()[0];
        let err = game.make_move(mv).unwrap_err();
        assert!(err.is_game_over());
        assert!(game.has_lost());
        assert_eq!(game.turn(), 1);
        assert_eq!(game.rows_cleared(), 0);
        assert!(game.legal_moves().is_empty());
        assert!(game.make_move(mv).unwrap_err().is_game_already_over());
        assert_eq!(game.turn(), 1);
    }

    #[test]
    fn test_illegal_move_is_rejected() {
        let mut game = Game::new(21, 10, 5);
        let err = game.make_move(Move::new(0, 10)).unwrap_err();
        assert!(err.is_illegal());
        assert_eq!(game.turn(), 0);
        assert!(!game.has_lost());
    }

    #[test]
    fn test_stacking_in_one_column_eventually_loses() {
        let mut game = Game::new(21, 10, 11);
        let mut result = Ok(0);
        for _ in 0..100 {
            result = game.make_move(Move::new(0, 0));
            if result.is_err() {
                break;
            }
        }
        assert!(result.unwrap_err().is_game_over());
        assert!(game.turn() <= 21);
    }
}
