//! Cell positions and grid extents.
//!
//! Positions display in spreadsheet notation (`row 2, col 1` is `B3`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell by row and column (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> GridPosition {
        GridPosition { row, col }
    }

    /// Column label: 0 is `A`, 25 is `Z`, 26 is `AA`.
    pub fn column_label(col: usize) -> String {
        let mut letters = Vec::new();
        let mut remaining = col as u128 + 1;
        while remaining > 0 {
            remaining -= 1;
            letters.push(char::from(b'A' + (remaining % 26) as u8));
            remaining /= 26;
        }
        letters.iter().rev().collect()
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", GridPosition::column_label(self.col), self.row + 1)
    }
}

/// Size of a grid in rows and columns.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridExtent {
    pub rows: usize,
    pub cols: usize,
}

impl GridExtent {
    pub fn new(rows: usize, cols: usize) -> GridExtent {
        GridExtent { rows, cols }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn cell_count(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    pub fn contains(&self, pos: GridPosition) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Nearest position inside the extent. Meaningless for empty extents.
    pub fn clamp(&self, pos: GridPosition) -> GridPosition {
        GridPosition::new(
            pos.row.min(self.rows.saturating_sub(1)),
            pos.col.min(self.cols.saturating_sub(1)),
        )
    }

    /// Bottom-right cell.
    pub fn last(&self) -> Option<GridPosition> {
        (!self.is_empty()).then(|| GridPosition::new(self.rows - 1, self.cols - 1))
    }
}
