//! Board helpers for the 3x3 grid.
//!
//! The grid is stored row-major as `grid[row][column]`; `None` marks an empty cell. Turn parity
//! decides who moves: odd turns belong to X, even turns to O.

use crate::constants::BOARD_SIDE;
use crate::state::{Mark, Square};

pub type Grid = [[Option<Mark>; BOARD_SIDE]; BOARD_SIDE];

/// Every row, column and diagonal, as `(row, column)` triples.
pub const WINNING_LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// Mark expected to move on `turn`. Turn 1 is X's first move.
#[inline(always)]
pub fn actor_for(turn: u8) -> Mark {
    if turn % 2 == 1 {
        Mark::X
    } else {
        Mark::O
    }
}

pub fn in_bounds(square: &Square) -> bool {
    (square.row as usize) < BOARD_SIDE && (square.column as usize) < BOARD_SIDE
}

/// True if any line is fully held by `mark`.
pub fn has_line(grid: &Grid, mark: Mark) -> bool {
    WINNING_LINES
        .iter()
        .any(|line| line.iter().all(|&(row, column)| grid[row][column] == Some(mark)))
}

pub fn is_full(grid: &Grid) -> bool {
    grid.iter().flatten().all(|cell| cell.is_some())
}

/// Render one row as `X O _`.
pub fn render_row(row: &[Option<Mark>; BOARD_SIDE]) -> String {
    row.iter()
        .map(|cell| match cell {
            Some(Mark::X) => "X",
            Some(Mark::O) => "O",
            None => "_",
        })
        .collect::<Vec<_>>()
        .join(" ")
}
