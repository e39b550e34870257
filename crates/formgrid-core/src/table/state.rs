use super::queue::DeferredQueue;
use super::spans::{CellSpan, SpanModel};
use crate::error::{FormGridError, Result};
use crate::traversal::{CellPredicate, Direction, GridExtent, GridPosition, TraversalMode};
use formgrid_dates::ShortcutInterpreter;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// How text typed into a column is committed.
#[derive(Clone, Debug, Default)]
pub enum ColumnEditor {
    /// Stored as typed.
    #[default]
    Text,
    /// Interpreted as a date and stored in the pattern's format.
    Date(ShortcutInterpreter),
}

#[derive(Clone, Debug)]
pub struct ColumnSpec {
    pub name: String,
    pub width: u16,
    pub editable: bool,
    pub visible: bool,
    pub editor: ColumnEditor,
}

impl ColumnSpec {
    pub const DEFAULT_WIDTH: u16 = 12;

    pub fn new(name: impl Into<String>) -> Self {
        ColumnSpec {
            name: name.into(),
            width: Self::DEFAULT_WIDTH,
            editable: true,
            visible: true,
            editor: ColumnEditor::Text,
        }
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn date(mut self, interpreter: ShortcutInterpreter) -> Self {
        self.editor = ColumnEditor::Date(interpreter);
        self
    }
}

/// An edit in progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditSession {
    pub position: GridPosition,
    pub buffer: String,
}

/// Work queued from inside a host callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableCommand {
    /// Step from the current selection.
    Traverse(Direction),
    /// Open `target`, or the nearest acceptable cell in `direction`.
    Seek {
        target: GridPosition,
        direction: Direction,
    },
    /// Commit the current edit without moving.
    StopEditing,
}

/// Notifications for the host, collected with [`FormTable::take_events`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableEvent {
    SelectionChanged {
        from: Option<GridPosition>,
        to: GridPosition,
    },
    EditStarted(GridPosition),
    EditCommitted {
        position: GridPosition,
        old: Option<String>,
        new: String,
    },
    EditCancelled(GridPosition),
    /// A date edit could not be interpreted; the edit stays open.
    EditRejected {
        position: GridPosition,
        /// Character offset into the edit buffer
        offset: usize,
    },
    /// Set programmatically rather than through an edit.
    ValueChanged(GridPosition),
    TraversalExhausted {
        from: Option<GridPosition>,
        direction: Direction,
    },
}

/// A spreadsheet-like data entry table.
pub struct FormTable {
    /// Columns in display order
    pub(crate) columns: Vec<ColumnSpec>,
    pub(crate) rows: usize,
    /// Sparse cell text, keyed by span anchor for merged cells
    pub(crate) cells: HashMap<GridPosition, String>,
    /// Individually locked cells
    pub(crate) locked: HashSet<GridPosition>,
    pub(crate) spans: SpanModel,
    pub(crate) selection: Option<GridPosition>,
    pub(crate) editing: Option<EditSession>,
    pub(crate) mode: TraversalMode,
    /// Queue a step to the next cell after each successful commit
    pub(crate) advance_on_commit: bool,
    pub(crate) pending: DeferredQueue<TableCommand>,
    pub(crate) events: Vec<TableEvent>,
}

impl FormTable {
    pub fn new(columns: Vec<ColumnSpec>, rows: usize) -> Self {
        FormTable {
            columns,
            rows,
            cells: HashMap::new(),
            locked: HashSet::new(),
            spans: SpanModel::new(),
            selection: None,
            editing: None,
            mode: TraversalMode::data_entry(),
            advance_on_commit: false,
            pending: DeferredQueue::new(),
            events: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: TraversalMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_advance_on_commit(mut self, advance: bool) -> Self {
        self.advance_on_commit = advance;
        self
    }

    pub fn extent(&self) -> GridExtent {
        GridExtent::new(self.rows, self.columns.len())
    }

    pub fn mode(&self) -> &TraversalMode {
        &self.mode
    }

    pub fn set_mode(&mut self, mode: TraversalMode) {
        self.mode = mode;
    }

    pub fn advance_on_commit(&self) -> bool {
        self.advance_on_commit
    }

    pub fn set_advance_on_commit(&mut self, advance: bool) {
        self.advance_on_commit = advance;
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Result<&mut ColumnSpec> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| FormGridError::UnknownColumn(name.to_string()))
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn append_row(&mut self) -> usize {
        self.rows += 1;
        self.rows - 1
    }

    pub fn selection(&self) -> Option<GridPosition> {
        self.selection
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Hand collected notifications to the host.
    pub fn take_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn check_bounds(&self, pos: GridPosition) -> Result<()> {
        if self.extent().contains(pos) {
            Ok(())
        } else {
            Err(FormGridError::OutOfBounds(pos))
        }
    }

    pub fn value(&self, pos: GridPosition) -> Option<&str> {
        self.cells
            .get(&self.spans.anchor_of(pos))
            .map(String::as_str)
    }

    /// Programmatic write (data binding); bypasses editability.
    pub fn set_value(&mut self, pos: GridPosition, text: impl Into<String>) -> Result<()> {
        self.check_bounds(pos)?;
        let anchor = self.spans.anchor_of(pos);
        let text = text.into();
        if text.is_empty() {
            self.cells.remove(&anchor);
        } else {
            self.cells.insert(anchor, text);
        }
        self.events.push(TableEvent::ValueChanged(anchor));
        Ok(())
    }

    /// Lock or unlock a single cell regardless of its column.
    pub fn set_locked(&mut self, pos: GridPosition, locked: bool) -> Result<()> {
        self.check_bounds(pos)?;
        if locked {
            self.locked.insert(pos);
        } else {
            self.locked.remove(&pos);
        }
        Ok(())
    }

    /// Merge a rectangle of cells into its top-left anchor.
    ///
    /// Values held by covered cells are dropped, and so is an edit open on
    /// one of them.
    pub fn merge(&mut self, span: CellSpan) -> Result<()> {
        let extent = self.extent();
        self.spans.merge(span, extent)?;
        if let Some(session) = &self.editing {
            if session.position != span.anchor && span.contains(session.position) {
                let position = session.position;
                self.editing = None;
                debug!(cell = %position, "edit dropped by merge");
                self.events.push(TableEvent::EditCancelled(position));
            }
        }
        self.cells
            .retain(|pos, _| !span.contains(*pos) || *pos == span.anchor);
        if let Some(selected) = self.selection {
            if span.contains(selected) {
                self.selection = Some(span.anchor);
            }
        }
        Ok(())
    }

    pub fn unmerge(&mut self, anchor: GridPosition) -> Option<CellSpan> {
        self.spans.unmerge(anchor)
    }

    pub fn spans(&self) -> &SpanModel {
        &self.spans
    }
}

impl CellPredicate for FormTable {
    fn is_editable(&self, pos: GridPosition) -> bool {
        self.columns.get(pos.col).is_some_and(|c| c.editable) && !self.locked.contains(&pos)
    }

    fn is_visible(&self, pos: GridPosition) -> bool {
        self.columns.get(pos.col).is_some_and(|c| c.visible) && self.spans.is_visible(pos)
    }
}
