pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Default board height, including one row of spawn headroom.
pub const DEFAULT_ROWS: usize = 21;
/// Default board width.
pub const DEFAULT_COLS: usize = 10;

/// Narrowest supported board; the horizontal I piece needs four columns.
pub const MIN_COLS: usize = 4;
/// Widest supported board.
pub const MAX_COLS: usize = 16;
