//! Merged cells.
//!
//! A span covers a rectangle of cells. Only its anchor (top-left) is visible;
//! the covered cells are skipped by traversal and redirect to the anchor.

use crate::error::{FormGridError, Result};
use crate::traversal::{GridExtent, GridPosition};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSpan {
    pub anchor: GridPosition,
    pub rows: usize,
    pub cols: usize,
}

impl CellSpan {
    pub fn new(anchor: GridPosition, rows: usize, cols: usize) -> CellSpan {
        CellSpan { anchor, rows, cols }
    }

    /// One past the last covered row. Saturates for spans reaching past `usize::MAX`.
    fn row_end(&self) -> usize {
        self.anchor.row.saturating_add(self.rows)
    }

    /// One past the last covered column.
    fn col_end(&self) -> usize {
        self.anchor.col.saturating_add(self.cols)
    }

    /// Bottom-right covered cell, `None` for empty or overflowing spans.
    pub fn last(&self) -> Option<GridPosition> {
        let row = self.anchor.row.checked_add(self.rows)?.checked_sub(1)?;
        let col = self.anchor.col.checked_add(self.cols)?.checked_sub(1)?;
        (self.rows > 0 && self.cols > 0).then(|| GridPosition::new(row, col))
    }

    pub fn contains(&self, pos: GridPosition) -> bool {
        pos.row >= self.anchor.row
            && pos.row < self.row_end()
            && pos.col >= self.anchor.col
            && pos.col < self.col_end()
    }

    pub fn covers_col(&self, col: usize) -> bool {
        col >= self.anchor.col && col < self.col_end()
    }

    fn overlaps(&self, other: &CellSpan) -> bool {
        self.anchor.row < other.row_end()
            && other.anchor.row < self.row_end()
            && self.anchor.col < other.col_end()
            && other.anchor.col < self.col_end()
    }
}

#[derive(Clone, Debug, Default)]
pub struct SpanModel {
    spans: Vec<CellSpan>,
}

impl SpanModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a span. 1x1 spans are accepted and have no effect on visibility.
    pub fn merge(&mut self, span: CellSpan, extent: GridExtent) -> Result<()> {
        match span.last() {
            Some(last) if extent.contains(last) => {}
            Some(last) => return Err(FormGridError::OutOfBounds(last)),
            None => return Err(FormGridError::OutOfBounds(span.anchor)),
        }
        if self.spans.iter().any(|s| s.overlaps(&span)) {
            return Err(FormGridError::SpanOverlap {
                anchor: span.anchor,
            });
        }
        self.spans.push(span);
        Ok(())
    }

    pub fn unmerge(&mut self, anchor: GridPosition) -> Option<CellSpan> {
        let idx = self.spans.iter().position(|s| s.anchor == anchor)?;
        Some(self.spans.remove(idx))
    }

    pub fn span_at(&self, pos: GridPosition) -> Option<&CellSpan> {
        self.spans.iter().find(|s| s.contains(pos))
    }

    /// The visible cell that shows `pos`.
    pub fn anchor_of(&self, pos: GridPosition) -> GridPosition {
        self.span_at(pos).map_or(pos, |s| s.anchor)
    }

    pub fn is_visible(&self, pos: GridPosition) -> bool {
        self.anchor_of(pos) == pos
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellSpan> {
        self.spans.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: usize, col: usize) -> GridPosition {
        GridPosition::new(row, col)
    }

    #[test]
    fn test_only_anchor_is_visible() {
        let mut spans = SpanModel::new();
        spans.merge(CellSpan::new(p(1, 1), 2, 2), GridExtent::new(4, 4)).unwrap();
        assert!(spans.is_visible(p(1, 1)));
        assert!(!spans.is_visible(p(2, 2)));
        assert!(!spans.is_visible(p(1, 2)));
        assert!(spans.is_visible(p(3, 3)));
        assert_eq!(spans.anchor_of(p(2, 1)), p(1, 1));
    }

    #[test]
    fn test_merge_rejects_overlap_and_out_of_bounds() {
        let extent = GridExtent::new(4, 4);
        let mut spans = SpanModel::new();
        spans.merge(CellSpan::new(p(0, 0), 2, 2), extent).unwrap();
        assert!(matches!(
            spans.merge(CellSpan::new(p(1, 1), 2, 2), extent),
            Err(FormGridError::SpanOverlap { .. })
        ));
        assert!(matches!(
            spans.merge(CellSpan::new(p(3, 3), 2, 1), extent),
            Err(FormGridError::OutOfBounds(_))
        ));
        assert!(spans.merge(CellSpan::new(p(2, 2), 2, 2), extent).is_ok());
    }

    #[test]
    fn test_merge_with_huge_anchor_is_out_of_bounds() {
        let extent = GridExtent::new(4, 4);
        let mut spans = SpanModel::new();
        assert!(matches!(
            spans.merge(CellSpan::new(p(usize::MAX, 0), 2, 1), extent),
            Err(FormGridError::OutOfBounds(pos)) if pos == p(usize::MAX, 0)
        ));
        assert!(matches!(
            spans.merge(CellSpan::new(p(0, usize::MAX), 1, usize::MAX), extent),
            Err(FormGridError::OutOfBounds(_))
        ));
        assert!(matches!(
            spans.merge(CellSpan::new(p(0, 0), 0, 2), extent),
            Err(FormGridError::OutOfBounds(_))
        ));
        assert!(spans.is_empty());

        let wide = CellSpan::new(p(usize::MAX - 1, 0), 5, 1);
        assert!(wide.contains(p(usize::MAX, 0)));
        assert!(!wide.contains(p(0, 0)));
    }

    #[test]
    fn test_unmerge_restores_visibility() {
        let mut spans = SpanModel::new();
        spans.merge(CellSpan::new(p(0, 0), 1, 3), GridExtent::new(2, 3)).unwrap();
        assert!(!spans.is_visible(p(0, 2)));
        assert!(spans.unmerge(p(0, 0)).is_some());
        assert!(spans.is_visible(p(0, 2)));
        assert!(spans.unmerge(p(0, 0)).is_none());
    }
}
