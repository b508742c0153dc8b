//! Raw measurements behind each [`BoardFeature`](super::BoardFeature).
//!
//! All functions take the board as it stands after the placement settled and
//! full rows were removed.

use evotris_engine::{Board, PieceShape};

use super::to_u32;

/// Landing height of the placed piece.
///
/// # Raw measurement
///
/// `raw = landing row + (piece height - 1) / 2`, i.e. the row of the piece's
/// vertical midpoint, rounded down.
#[must_use]
pub fn landing_height(shape: &PieceShape, landing_height: usize) -> u32 {
    to_u32(landing_height + (shape.height - 1) / 2)
}

/// Horizontal fragmentation.
///
/// # Raw measurement
///
/// For every row, count the adjacent cell pairs whose filled state differs,
/// scanning left to right. The position past the last column counts as filled,
/// so a row ending in an empty cell adds one transition.
#[must_use]
pub fn row_transitions(board: &Board) -> u32 {
    let mut transitions = 0;
    for row in 0..board.rows() {
        let mut prev_filled = board.is_filled(row, 0);
        for col in 1..board.cols() {
            let filled = board.is_filled(row, col);
            if filled != prev_filled {
                transitions += 1;
            }
            prev_filled = filled;
        }
        if !prev_filled {
            transitions += 1;
        }
    }
    transitions
}

/// Vertical fragmentation.
///
/// # Raw measurement
///
/// For every column, count the adjacent cell pairs whose filled state differs,
/// scanning bottom to top. The position past the last row counts as filled.
#[must_use]
pub fn column_transitions(board: &Board) -> u32 {
    let mut transitions = 0;
    for col in 0..board.cols() {
        let mut prev_filled = board.is_filled(0, col);
        for row in 1..board.rows() {
            let filled = board.is_filled(row, col);
            if filled != prev_filled {
                transitions += 1;
            }
            prev_filled = filled;
        }
        if !prev_filled {
            transitions += 1;
        }
    }
    transitions
}

/// Number of covered empty cells.
///
/// # Raw measurement
///
/// For each column, count the empty cells strictly below the column's top.
#[must_use]
pub fn holes(board: &Board) -> u32 {
    let mut holes = 0;
    for (col, &top) in board.top().iter().enumerate() {
        holes += (0..top).filter(|&row| !board.is_filled(row, col)).count();
    }
    to_u32(holes)
}

/// Cumulative well depth.
///
/// # Raw measurement
///
/// A well cell is an empty cell whose left and right neighbours are both
/// filled; the board edge counts as filled. Each well cell contributes one
/// plus the number of consecutive empty cells directly below it.
#[must_use]
pub fn well_depth(board: &Board) -> u32 {
    let cols = board.cols();
    let mut sum = 0;
    for col in 0..cols {
        for row in 0..board.rows() {
            if board.is_filled(row, col) {
                continue;
            }
            let left = col == 0 || board.is_filled(row, col - 1);
            let right = col + 1 == cols || board.is_filled(row, col + 1);
            if !(left && right) {
                continue;
            }
            let below = (0..row)
                .rev()
                .take_while(|&r| !board.is_filled(r, col))
                .count();
            sum += 1 + below;
        }
    }
    to_u32(sum)
}

#[cfg(test)]
mod tests {
    use evotris_engine::PieceKind;

    use super::*;

    #[test]
    fn test_landing_height_uses_piece_midpoint() {
        // vertical I: height 4 -> +1
        assert_eq!(landing_height(PieceKind::I.shape(0), 3), 4);
        // horizontal I: height 1 -> +0
        assert_eq!(landing_height(PieceKind::I.shape(1), 3), 3);
        // L upright: height 3 -> +1
        assert_eq!(landing_height(PieceKind::L.shape(0), 0), 1);
        // O: height 2 -> +0
        assert_eq!(landing_height(PieceKind::O.shape(0), 5), 5);
    }

    #[test]
    fn test_row_transitions() {
        let board = Board::from_ascii(
            4,
            6,
            "
            ......
            #.#...
            ######
            .#####
            ",
        );
        // row 0: .##### -> 1 change, ends filled
        // row 1: ###### -> 0
        // row 2: #.#... -> 3 changes, ends empty -> +1
        // row 3: ...... -> ends empty -> +1
        assert_eq!(row_transitions(&board), 1 + 3 + 1 + 1);
    }

    #[test]
    fn test_column_transitions() {
        let board = Board::from_ascii(
            4,
            4,
            "
            ....
            #...
            .#..
            #...
            ",
        );
        // col 0: # . # . -> 3 changes, ends empty -> +1
        // col 1: . # . . -> 2 changes, ends empty -> +1
        // cols 2, 3: empty -> +1 each
        assert_eq!(column_transitions(&board), 4 + 3 + 1 + 1);
    }

    #[test]
    fn test_holes() {
        let board = Board::from_ascii(
            20,
            10,
            "
            #..#......
            ...#......
            #..#......
            .#.#......
            ",
        );
        // column 0: rows 0 and 2 empty below top 4; column 3: none
        assert_eq!(holes(&board), 2);
        assert_eq!(holes(&Board::new(20, 10)), 0);
    }

    #[test]
    fn test_well_depth_interior() {
        let board = Board::from_ascii(
            20,
            6,
            "
            #.#...
            #.#...
            ###...
            ",
        );
        // column 1: row 2 -> 1 + 1 empty below = 2, row 1 -> 1
        assert_eq!(well_depth(&board), 3);
    }

    #[test]
    fn test_well_depth_edges_use_inward_neighbour() {
        let board = Board::from_ascii(
            20,
            5,
            "
            .#.#.
            ##.##
            ",
        );
        // column 0 row 1: wall + filled -> 1
        // column 2 rows 1, 0: 2 + 1
        // column 4 row 1: filled + wall -> 1
        assert_eq!(well_depth(&board), 1 + 3 + 1);
    }
}
