//! Traversal policy.

use serde::{Deserialize, Serialize};

/// Which index a step changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Step the column index along the current row.
    #[default]
    ByColumn,
    /// Step the row index down the current column.
    ByRow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Next,
    Previous,
}

/// How traversal steps, wraps and filters cells.
///
/// The flags are independent. When both `no_line_wrap` and `wrap_in_line`
/// are set, `no_line_wrap` wins: the step stops at the end of the line.
/// `no_table_wrap` only matters when lines wrap into the next line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraversalMode {
    pub axis: Axis,
    /// Stop at the end of a line instead of wrapping.
    pub no_line_wrap: bool,
    /// Wrap to the start of the same line instead of the next one.
    pub wrap_in_line: bool,
    /// Stop at the grid corner instead of wrapping to the opposite corner.
    pub no_table_wrap: bool,
    /// Only land on editable cells.
    pub skip_non_editable: bool,
    /// Start editing the cell that was landed on.
    pub auto_edit: bool,
}

impl TraversalMode {
    pub fn by_column() -> Self {
        TraversalMode::default()
    }

    pub fn by_row() -> Self {
        TraversalMode {
            axis: Axis::ByRow,
            ..TraversalMode::default()
        }
    }

    /// Tab-like data entry: editable cells only, editing starts on arrival.
    pub fn data_entry() -> Self {
        TraversalMode {
            skip_non_editable: true,
            auto_edit: true,
            ..TraversalMode::default()
        }
    }

    pub fn no_line_wrap(mut self) -> Self {
        self.no_line_wrap = true;
        self
    }

    pub fn wrap_in_line(mut self) -> Self {
        self.wrap_in_line = true;
        self
    }

    pub fn no_table_wrap(mut self) -> Self {
        self.no_table_wrap = true;
        self
    }

    pub fn skip_non_editable(mut self) -> Self {
        self.skip_non_editable = true;
        self
    }

    pub fn auto_edit(mut self) -> Self {
        self.auto_edit = true;
        self
    }

    /// `no_line_wrap` and `wrap_in_line` together; the former applies.
    pub fn has_conflicting_wrap(&self) -> bool {
        self.no_line_wrap && self.wrap_in_line
    }
}
