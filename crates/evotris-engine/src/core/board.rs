use super::{
    MAX_COLS, MIN_COLS,
    piece::{Move, PieceKind, PieceShape},
};

/// Outcome of dropping a piece onto a [`Board`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Placement {
    /// The piece came to rest and full rows were removed.
    Settled {
        /// Row the piece's lowest local row rests on.
        landing_height: usize,
        /// Number of rows completed and removed by this placement.
        rows_cleared: usize,
    },
    /// The piece would stick out of the top of the board. The board is unchanged.
    GameOver,
}

/// Playing field made of turn-stamped cells.
///
/// Each cell holds the turn number of the placement that filled it, or 0 when
/// empty. Row 0 is the bottom row.
///
/// A per-column height cache `top` is kept alongside the cells:
/// `top[c]` is one plus the highest occupied row of column `c`, or 0 when the
/// column is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<u64>,
    top: Vec<usize>,
    turn: u64,
}

impl Board {
    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is 0 or `cols` is outside `MIN_COLS..=MAX_COLS`.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0, "board must have at least one row");
        assert!(
            (MIN_COLS..=MAX_COLS).contains(&cols),
            "board width must be in {MIN_COLS}..={MAX_COLS}, got {cols}"
        );
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
            top: vec![0; cols],
            turn: 0,
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of placements settled on this board.
    #[must_use]
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Per-column heights.
    #[must_use]
    pub fn top(&self) -> &[usize] {
        &self.top
    }

    #[must_use]
    pub fn max_height(&self) -> usize {
        self.top.iter().copied().max().unwrap_or(0)
    }

    /// Returns the turn stamp of a cell (0 when empty).
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> u64 {
        self.cells[row * self.cols + col]
    }

    #[inline]
    #[must_use]
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.cell(row, col) != 0
    }

    fn set_cell(&mut self, row: usize, col: usize, stamp: u64) {
        self.cells[row * self.cols + col] = stamp;
    }

    fn is_row_full(&self, row: usize) -> bool {
        self.cells[row * self.cols..][..self.cols]
            .iter()
            .all(|&c| c != 0)
    }

    /// Computes the row a piece in the given shape rests on when dropped at `slot`.
    #[must_use]
    pub fn landing_height(&self, shape: &PieceShape, slot: usize) -> usize {
        // Every shape has a column with a zero bottom offset, so saturating
        // never lowers the maximum.
        shape
            .columns()
            .map(|(i, bottom, _)| self.top[slot + i].saturating_sub(bottom))
            .max()
            .unwrap_or(0)
    }

    /// Drops `piece` with the given move, then removes completed rows.
    ///
    /// Returns [`Placement::GameOver`] without touching the board when the
    /// piece would reach the top row.
    ///
    /// # Panics
    ///
    /// Panics if the move does not fit the board.
    pub fn place(&mut self, piece: PieceKind, mv: Move) -> Placement {
        assert!(
            mv.is_legal(piece, self.cols),
            "illegal move {mv} for piece {piece}"
        );
        let shape = piece.shape(mv.orientation);
        let height = self.landing_height(shape, mv.slot);
        if height + shape.height >= self.rows {
            return Placement::GameOver;
        }

        self.turn += 1;
        let stamp = self.turn;
        for (i, bottom, top) in shape.columns() {
            let col = mv.slot + i;
            for row in height + bottom..height + top {
                self.set_cell(row, col, stamp);
            }
            self.top[col] = height + top;
        }

        // Scan from the top of the piece downward. Removing a row only shifts
        // rows above it, so lower indices stay valid.
        let mut rows_cleared = 0;
        for row in (height..height + shape.height).rev() {
            if self.is_row_full(row) {
                rows_cleared += 1;
                self.remove_row(row);
            }
        }

        Placement::Settled {
            landing_height: height,
            rows_cleared,
        }
    }

    fn remove_row(&mut self, row: usize) {
        for col in 0..self.cols {
            for r in row..self.top[col] {
                let above = if r + 1 < self.rows {
                    self.cell(r + 1, col)
                } else {
                    0
                };
                self.set_cell(r, col, above);
            }
            self.top[col] -= 1;
            while self.top[col] >= 1 && !self.is_filled(self.top[col] - 1, col) {
                self.top[col] -= 1;
            }
        }
    }

    /// Creates a board from ASCII art for testing.
    ///
    /// `#` is an occupied cell and `.` an empty one. Lines are given top to
    /// bottom and describe the lowest rows of the board; the width of each
    /// line must equal the board width.
    ///
    /// # Panics
    ///
    /// Panics if the art is taller than `rows` or a line has the wrong width.
    #[must_use]
    pub fn from_ascii(rows: usize, cols: usize, art: &str) -> Self {
        let mut board = Self::new(rows, cols);
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        assert!(
            lines.len() <= rows,
            "art has {} rows, board has {rows}",
            lines.len()
        );

        for (i, line) in lines.iter().rev().enumerate() {
            let chars: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                chars.len(),
                cols,
                "Each row must have exactly {cols} cells, got {} at row {i}",
                chars.len()
            );
            for (col, &ch) in chars.iter().enumerate() {
                if ch == '#' {
                    board.set_cell(i, col, 1);
                    board.top[col] = i + 1;
                }
            }
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_top_invariant(board: &Board) {
        for col in 0..board.cols() {
            let expected = (0..board.rows())
                .rev()
                .find(|&row| board.is_filled(row, col))
                .map_or(0, |row| row + 1);
            assert_eq!(board.top()[col], expected, "column {col}");
        }
    }

    #[test]
    fn test_empty_board() {
        let board = Board::new(21, 10);
        assert_eq!(board.rows(), 21);
        assert_eq!(board.cols(), 10);
        assert_eq!(board.max_height(), 0);
        assert_eq!(board.turn(), 0);
        assert_top_invariant(&board);
    }

    #[test]
    fn test_from_ascii_sets_top() {
        let board = Board::from_ascii(
            20,
            10,
            "
            #.........
            ..........
            ##.......#
            ",
        );
        assert_eq!(board.top(), &[3, 1, 0, 0, 0, 0, 0, 0, 0, 1]);
        assert!(board.is_filled(2, 0));
        assert!(!board.is_filled(1, 0));
        assert_top_invariant(&board);
    }

    #[test]
    fn test_landing_height_uses_bottom_profile() {
        let board = Board::from_ascii(
            20,
            10,
            "
            .#........
            ##........
            ",
        );
        // T pointing down: bottom offsets [1, 0, 1]
        let shape = PieceKind::T.shape(1);
        assert_eq!(board.landing_height(shape, 0), 2);
        assert_eq!(board.landing_height(shape, 1), 1);
        assert_eq!(board.landing_height(shape, 2), 0);
    }

    #[test]
    fn test_place_stamps_turn_and_updates_top() {
        let mut board = Board::new(20, 10);
        let placement = board.place(PieceKind::O, Move::new(0, 3));
        assert_eq!(
            placement,
            Placement::Settled {
                landing_height: 0,
                rows_cleared: 0
            }
        );
        assert_eq!(board.turn(), 1);
        assert_eq!(board.cell(0, 3), 1);
        assert_eq!(board.cell(1, 4), 1);
        assert_eq!(board.top()[3], 2);
        assert_eq!(board.top()[4], 2);

        board.place(PieceKind::O, Move::new(0, 4));
        assert_eq!(board.cell(2, 4), 2);
        assert_eq!(board.cell(3, 5), 2);
        assert_eq!(board.top()[5], 4);
        assert_top_invariant(&board);
    }

    #[test]
    fn test_place_clears_single_row() {
        let mut board = Board::from_ascii(
            20,
            10,
            "
            #########.
            ",
        );
        let placement = board.place(PieceKind::I, Move::new(0, 9));
        assert_eq!(
            placement,
            Placement::Settled {
                landing_height: 0,
                rows_cleared: 1
            }
        );
        assert_eq!(board.top(), &[0, 0, 0, 0, 0, 0, 0, 0, 0, 3]);
        assert_top_invariant(&board);
    }

    #[test]
    fn test_place_clears_non_adjacent_rows() {
        let mut board = Board::from_ascii(
            20,
            10,
            "
            #########.
            #.#######.
            #########.
            ",
        );
        let placement = board.place(PieceKind::I, Move::new(0, 9));
        assert_eq!(
            placement,
            Placement::Settled {
                landing_height: 0,
                rows_cleared: 2
            }
        );
        // the middle row drops to the bottom, the I piece keeps two cells
        assert!(board.is_filled(0, 0));
        assert!(!board.is_filled(0, 1));
        assert!(board.is_filled(0, 9));
        assert!(board.is_filled(1, 9));
        assert!(!board.is_filled(2, 9));
        assert_eq!(board.top(), &[1, 0, 1, 1, 1, 1, 1, 1, 1, 2]);
        assert_top_invariant(&board);
    }

    #[test]
    fn test_place_clears_four_rows() {
        let mut board = Board::from_ascii(
            20,
            10,
            "
            .#########
            .#########
            .#########
            .#########
            ",
        );
        let placement = board.place(PieceKind::I, Move::new(0, 0));
        assert_eq!(
            placement,
            Placement::Settled {
                landing_height: 0,
                rows_cleared: 4
            }
        );
        assert_eq!(board.max_height(), 0);
        assert_top_invariant(&board);
    }

    #[test]
    fn test_clear_skips_holes_when_recomputing_top() {
        let mut board = Board::from_ascii(
            20,
            10,
            "
            #.........
            ..........
            #########.
            ",
        );
        // column 0 keeps its top cell above a gap after the bottom row clears
        let placement = board.place(PieceKind::I, Move::new(0, 9));
        assert_eq!(
            placement,
            Placement::Settled {
                landing_height: 0,
                rows_cleared: 1
            }
        );
        assert_eq!(board.top(), &[2, 0, 0, 0, 0, 0, 0, 0, 0, 3]);
        assert!(!board.is_filled(0, 0));
        board.place(PieceKind::O, Move::new(0, 4));
        assert_top_invariant(&board);

        let mut board = Board::from_ascii(
            20,
            10,
            "
            ##########
            ",
        );
        // a pre-filled full row is only cleared by a placement touching it
        assert_eq!(board.max_height(), 1);
        let placement = board.place(PieceKind::I, Move::new(1, 0));
        assert_eq!(
            placement,
            Placement::Settled {
                landing_height: 1,
                rows_cleared: 0
            }
        );
        assert_top_invariant(&board);
    }

    #[test]
    fn test_stamps_past_u32_range() {
        let mut board = Board::new(20, 10);
        board.turn = u64::from(u32::MAX);
        board.place(PieceKind::O, Move::new(0, 0));
        assert_eq!(board.turn(), u64::from(u32::MAX) + 1);
        assert_eq!(board.cell(0, 0), u64::from(u32::MAX) + 1);
        assert!(board.is_filled(1, 1));
    }

    #[test]
    fn test_game_over_leaves_board_untouched() {
        let mut board = Board::new(4, 10);
        let before = board.clone();
        // vertical I needs rows 0..4, which reaches the top of a 4-row board
        assert_eq!(
            board.place(PieceKind::I, Move::new(0, 0)),
            Placement::GameOver
        );
        assert_eq!(board, before);

        let mut board = Board::new(1, 10);
        assert!(board.place(PieceKind::I, Move::new(1, 0)).is_game_over());
    }
}
