//! The traversal engine.
//!
//! Stepping visits every cell of the grid in a fixed cyclic order (or one line
//! of it under `wrap_in_line`), so a scan that finds nothing always returns to
//! its start. Clamping modes stop at the first edge crossing instead.

use super::mode::{Axis, Direction, TraversalMode};
use super::position::{GridExtent, GridPosition};

/// Per-cell facts the engine needs from the caller.
pub trait CellPredicate {
    fn is_editable(&self, pos: GridPosition) -> bool;

    /// Hidden cells (the covered part of a merged span) are never landed on.
    fn is_visible(&self, _pos: GridPosition) -> bool {
        true
    }
}

impl<P: CellPredicate + ?Sized> CellPredicate for &P {
    fn is_editable(&self, pos: GridPosition) -> bool {
        (**self).is_editable(pos)
    }

    fn is_visible(&self, pos: GridPosition) -> bool {
        (**self).is_visible(pos)
    }
}

fn always(_: GridPosition) -> bool {
    true
}

/// Closure-backed predicate.
pub struct FnPredicate<E, V = fn(GridPosition) -> bool> {
    editable: E,
    visible: V,
}

impl<E> FnPredicate<E>
where
    E: Fn(GridPosition) -> bool,
{
    pub fn new(editable: E) -> Self {
        FnPredicate {
            editable,
            visible: always,
        }
    }
}

impl<E, V> FnPredicate<E, V> {
    pub fn with_visible<W>(self, visible: W) -> FnPredicate<E, W>
    where
        W: Fn(GridPosition) -> bool,
    {
        FnPredicate {
            editable: self.editable,
            visible,
        }
    }
}

impl<E, V> CellPredicate for FnPredicate<E, V>
where
    E: Fn(GridPosition) -> bool,
    V: Fn(GridPosition) -> bool,
{
    fn is_editable(&self, pos: GridPosition) -> bool {
        (self.editable)(pos)
    }

    fn is_visible(&self, pos: GridPosition) -> bool {
        (self.visible)(pos)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalResult {
    Found {
        position: GridPosition,
        /// Enter edit mode on arrival (`auto_edit`).
        begin_edit: bool,
    },
    /// Nothing acceptable under the active wrap policy.
    NotFound,
}

impl TraversalResult {
    pub fn position(&self) -> Option<GridPosition> {
        match self {
            TraversalResult::Found { position, .. } => Some(*position),
            TraversalResult::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, TraversalResult::Found { .. })
    }
}

enum Step {
    Moved(GridPosition),
    /// An edge was crossed under a clamping policy; the position is the boundary cell.
    Clamped(GridPosition),
}

/// Whether traversal may land on `pos`.
pub fn accepts<P: CellPredicate>(mode: &TraversalMode, predicate: &P, pos: GridPosition) -> bool {
    predicate.is_visible(pos) && (!mode.skip_non_editable || predicate.is_editable(pos))
}

pub fn next<P: CellPredicate>(
    from: GridPosition,
    extent: GridExtent,
    mode: &TraversalMode,
    predicate: &P,
) -> TraversalResult {
    traverse(from, extent, mode, predicate, Direction::Next)
}

pub fn previous<P: CellPredicate>(
    from: GridPosition,
    extent: GridExtent,
    mode: &TraversalMode,
    predicate: &P,
) -> TraversalResult {
    traverse(from, extent, mode, predicate, Direction::Previous)
}

/// Step from `from` until an acceptable cell is found.
///
/// `from` itself is only a candidate again when a clamping policy stops the
/// scan on it. Positions outside `extent` are clamped first.
pub fn traverse<P: CellPredicate>(
    from: GridPosition,
    extent: GridExtent,
    mode: &TraversalMode,
    predicate: &P,
    direction: Direction,
) -> TraversalResult {
    if extent.is_empty() {
        return TraversalResult::NotFound;
    }
    let start = extent.clamp(from);
    let found = |position| TraversalResult::Found {
        position,
        begin_edit: mode.auto_edit,
    };

    let mut cursor = start;
    for _ in 0..extent.cell_count() {
        match step(cursor, extent, mode, direction) {
            Step::Moved(pos) if pos == start => return TraversalResult::NotFound,
            Step::Moved(pos) => {
                if accepts(mode, predicate, pos) {
                    return found(pos);
                }
                cursor = pos;
            }
            Step::Clamped(pos) => {
                return if accepts(mode, predicate, pos) {
                    found(pos)
                } else {
                    TraversalResult::NotFound
                };
            }
        }
    }
    TraversalResult::NotFound
}

/// Land on `request` if acceptable, otherwise on the nearest acceptable cell
/// after it in traversal order.
pub fn seek<P: CellPredicate>(
    request: GridPosition,
    extent: GridExtent,
    mode: &TraversalMode,
    predicate: &P,
    direction: Direction,
) -> TraversalResult {
    if extent.is_empty() {
        return TraversalResult::NotFound;
    }
    let start = extent.clamp(request);
    if accepts(mode, predicate, start) {
        return TraversalResult::Found {
            position: start,
            begin_edit: mode.auto_edit,
        };
    }
    traverse(start, extent, mode, predicate, direction)
}

fn step(pos: GridPosition, extent: GridExtent, mode: &TraversalMode, direction: Direction) -> Step {
    // Work in (line, index) space: a line is a row when stepping by column.
    let (line, index, line_len, line_count) = match mode.axis {
        Axis::ByColumn => (pos.row, pos.col, extent.cols, extent.rows),
        Axis::ByRow => (pos.col, pos.row, extent.rows, extent.cols),
    };
    let to_position = |line: usize, index: usize| match mode.axis {
        Axis::ByColumn => GridPosition::new(line, index),
        Axis::ByRow => GridPosition::new(index, line),
    };

    let moved = match direction {
        Direction::Next => {
            if index + 1 < line_len {
                Some((line, index + 1))
            } else if mode.no_line_wrap {
                None
            } else if mode.wrap_in_line {
                Some((line, 0))
            } else if line + 1 < line_count {
                Some((line + 1, 0))
            } else if mode.no_table_wrap {
                None
            } else {
                Some((0, 0))
            }
        }
        Direction::Previous => {
            if index > 0 {
                Some((line, index - 1))
            } else if mode.no_line_wrap {
                None
            } else if mode.wrap_in_line {
                Some((line, line_len - 1))
            } else if line > 0 {
                Some((line - 1, line_len - 1))
            } else if mode.no_table_wrap {
                None
            } else {
                Some((line_count - 1, line_len - 1))
            }
        }
    };

    match moved {
        Some((line, index)) => Step::Moved(to_position(line, index)),
        None => Step::Clamped(pos),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: usize, col: usize) -> GridPosition {
        GridPosition::new(row, col)
    }

    fn all_editable() -> FnPredicate<impl Fn(GridPosition) -> bool> {
        FnPredicate::new(|_: GridPosition| true)
    }

    #[test]
    fn test_by_column_steps_along_row_then_wraps_to_next_row() {
        let extent = GridExtent::new(2, 3);
        let mode = TraversalMode::by_column();
        let pred = all_editable();
        assert_eq!(next(p(0, 0), extent, &mode, &pred).position(), Some(p(0, 1)));
        assert_eq!(next(p(0, 2), extent, &mode, &pred).position(), Some(p(1, 0)));
        assert_eq!(next(p(1, 2), extent, &mode, &pred).position(), Some(p(0, 0)));
    }

    #[test]
    fn test_by_row_steps_down_column() {
        let extent = GridExtent::new(2, 3);
        let mode = TraversalMode::by_row();
        let pred = all_editable();
        assert_eq!(next(p(0, 0), extent, &mode, &pred).position(), Some(p(1, 0)));
        assert_eq!(next(p(1, 0), extent, &mode, &pred).position(), Some(p(0, 1)));
        assert_eq!(previous(p(0, 1), extent, &mode, &pred).position(), Some(p(1, 0)));
        assert_eq!(previous(p(0, 0), extent, &mode, &pred).position(), Some(p(1, 2)));
    }

    #[test]
    fn test_previous_wraps_to_previous_line() {
        let extent = GridExtent::new(3, 3);
        let mode = TraversalMode::by_column();
        let pred = all_editable();
        assert_eq!(previous(p(1, 0), extent, &mode, &pred).position(), Some(p(0, 2)));
        assert_eq!(previous(p(0, 0), extent, &mode, &pred).position(), Some(p(2, 2)));
    }

    #[test]
    fn test_skip_non_editable() {
        let extent = GridExtent::new(2, 4);
        let mode = TraversalMode::by_column().skip_non_editable();
        let pred = FnPredicate::new(|pos: GridPosition| pos.col != 1 && pos.col != 2);
        assert_eq!(next(p(0, 0), extent, &mode, &pred).position(), Some(p(0, 3)));
        assert_eq!(next(p(0, 3), extent, &mode, &pred).position(), Some(p(1, 0)));

        // Without the flag editability is ignored.
        let plain = TraversalMode::by_column();
        assert_eq!(next(p(0, 0), extent, &plain, &pred).position(), Some(p(0, 1)));
    }

    #[test]
    fn test_hidden_cells_are_skipped_without_skip_flag() {
        let extent = GridExtent::new(1, 4);
        let mode = TraversalMode::by_column();
        let pred =
            FnPredicate::new(|_: GridPosition| true).with_visible(|pos: GridPosition| pos.col != 1);
        assert_eq!(next(p(0, 0), extent, &mode, &pred).position(), Some(p(0, 2)));
    }

    #[test]
    fn test_no_line_wrap_clamps_at_line_end() {
        let extent = GridExtent::new(3, 3);
        let mode = TraversalMode::by_column().no_line_wrap();
        let pred = all_editable();
        assert_eq!(
            next(p(0, 2), extent, &mode, &pred),
            TraversalResult::Found { position: p(0, 2), begin_edit: false }
        );
        assert_eq!(previous(p(1, 0), extent, &mode, &pred).position(), Some(p(1, 0)));

        let skip = mode.skip_non_editable();
        let pred = FnPredicate::new(|pos: GridPosition| pos.col == 0);
        assert_eq!(next(p(0, 0), extent, &skip, &pred), TraversalResult::NotFound);
    }

    #[test]
    fn test_no_line_wrap_takes_precedence_over_wrap_in_line() {
        let extent = GridExtent::new(2, 2);
        let mode = TraversalMode::by_column().no_line_wrap().wrap_in_line();
        assert!(mode.has_conflicting_wrap());
        let pred = all_editable();
        assert_eq!(next(p(0, 1), extent, &mode, &pred).position(), Some(p(0, 1)));
    }

    #[test]
    fn test_wrap_in_line_stays_on_line() {
        let extent = GridExtent::new(4, 5);
        let mode = TraversalMode::by_column().wrap_in_line();
        let pred = all_editable();
        let mut pos = p(2, 0);
        for _ in 0..17 {
            pos = previous(pos, extent, &mode, &pred).position().unwrap();
            assert_eq!(pos.row, 2);
        }
    }

    #[test]
    fn test_no_table_wrap_clamps_at_corners() {
        let extent = GridExtent::new(2, 2);
        let mode = TraversalMode::by_column().no_table_wrap();
        let pred = all_editable();
        assert_eq!(next(p(1, 1), extent, &mode, &pred).position(), Some(p(1, 1)));
        assert_eq!(previous(p(0, 0), extent, &mode, &pred).position(), Some(p(0, 0)));
        // Line wrapping still happens inside the table.
        assert_eq!(next(p(0, 1), extent, &mode, &pred).position(), Some(p(1, 0)));
    }

    #[test]
    fn test_full_cycle_without_match_is_not_found() {
        let extent = GridExtent::new(3, 3);
        let mode = TraversalMode::by_column().skip_non_editable();
        let pred = FnPredicate::new(|pos: GridPosition| pos == p(1, 1));
        assert_eq!(next(p(1, 1), extent, &mode, &pred), TraversalResult::NotFound);
        assert_eq!(previous(p(1, 1), extent, &mode, &pred), TraversalResult::NotFound);

        let nothing = FnPredicate::new(|_: GridPosition| false);
        assert_eq!(next(p(0, 0), extent, &mode, &nothing), TraversalResult::NotFound);
    }

    #[test]
    fn test_auto_edit_flag_is_reported() {
        let extent = GridExtent::new(1, 2);
        let mode = TraversalMode::data_entry();
        let pred = all_editable();
        assert_eq!(
            next(p(0, 0), extent, &mode, &pred),
            TraversalResult::Found { position: p(0, 1), begin_edit: true }
        );
    }

    #[test]
    fn test_empty_extent_and_out_of_range_start() {
        let pred = all_editable();
        let mode = TraversalMode::by_column();
        assert_eq!(next(p(0, 0), GridExtent::new(0, 3), &mode, &pred), TraversalResult::NotFound);
        // Start is clamped to C2 before stepping.
        let extent = GridExtent::new(2, 3);
        assert_eq!(next(p(9, 9), extent, &mode, &pred).position(), Some(p(0, 0)));
    }

    #[test]
    fn test_seek_lands_on_request_or_next_editable() {
        let extent = GridExtent::new(2, 3);
        let mode = TraversalMode::by_column().skip_non_editable();
        let pred = FnPredicate::new(|pos: GridPosition| pos.col == 2);
        assert_eq!(
            seek(p(1, 2), extent, &mode, &pred, Direction::Next).position(),
            Some(p(1, 2))
        );
        assert_eq!(
            seek(p(1, 0), extent, &mode, &pred, Direction::Next).position(),
            Some(p(1, 2))
        );
        assert_eq!(
            seek(p(1, 0), extent, &mode, &pred, Direction::Previous).position(),
            Some(p(0, 2))
        );
    }
}
