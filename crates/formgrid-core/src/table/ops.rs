use super::state::{ColumnEditor, EditSession, FormTable, TableCommand, TableEvent};
use crate::error::{FormGridError, Result};
use crate::traversal::{self, CellPredicate, Direction, GridPosition, TraversalResult};
use tracing::debug;

impl FormTable {
    /// Move the selection. An edit elsewhere is committed first.
    pub fn select(&mut self, pos: GridPosition) -> Result<()> {
        self.check_bounds(pos)?;
        let target = self.spans.anchor_of(pos);
        if let Some(session) = &self.editing {
            if session.position != target {
                self.finish_edit(false)?;
            }
        }
        if self.selection != Some(target) {
            let from = self.selection.replace(target);
            self.events.push(TableEvent::SelectionChanged { from, to: target });
        }
        Ok(())
    }

    /// Select `pos` and open an edit on it.
    pub fn begin_edit(&mut self, pos: GridPosition) -> Result<()> {
        self.check_bounds(pos)?;
        let target = self.spans.anchor_of(pos);
        if !self.is_editable(target) || !self.is_visible(target) {
            return Err(FormGridError::NotEditable(target));
        }
        if self.editing.as_ref().is_some_and(|s| s.position == target) {
            return Ok(());
        }
        self.select(target)?;
        let buffer = self.value(target).unwrap_or_default().to_string();
        debug!(cell = %target, "edit started");
        self.editing = Some(EditSession {
            position: target,
            buffer,
        });
        self.events.push(TableEvent::EditStarted(target));
        Ok(())
    }

    /// Replace the text of the current edit.
    pub fn set_edit_buffer(&mut self, text: impl Into<String>) -> Result<()> {
        let session = self.editing.as_mut().ok_or(FormGridError::NoActiveEdit)?;
        session.buffer = text.into();
        Ok(())
    }

    /// Commit the current edit.
    ///
    /// A date column that cannot interpret its buffer keeps the edit open and
    /// reports where the text went wrong. When `advance_on_commit` is set a
    /// step to the next cell is queued, not performed.
    pub fn commit_edit(&mut self) -> Result<GridPosition> {
        let advance = self.advance_on_commit;
        self.finish_edit(advance)
    }

    pub fn cancel_edit(&mut self) -> Result<()> {
        let session = self.editing.take().ok_or(FormGridError::NoActiveEdit)?;
        debug!(cell = %session.position, "edit cancelled");
        self.events.push(TableEvent::EditCancelled(session.position));
        Ok(())
    }

    pub fn request_next(&mut self) {
        self.post(TableCommand::Traverse(Direction::Next));
    }

    pub fn request_previous(&mut self) {
        self.post(TableCommand::Traverse(Direction::Previous));
    }

    /// Open `target`, or the next acceptable cell after it.
    pub fn request_cell(&mut self, target: GridPosition) {
        self.post(TableCommand::Seek {
            target,
            direction: Direction::Next,
        });
    }

    pub fn post(&mut self, command: TableCommand) {
        debug!(?command, "queued table command");
        self.pending.post(command);
    }

    /// Run the commands queued before this call. Returns how many ran.
    ///
    /// Commands queued while these run (for example by a commit that
    /// advances) are left for the next call. A move that cannot commit a date
    /// edit is dropped and shows up as [`TableEvent::EditRejected`].
    pub fn process_pending(&mut self) -> usize {
        let batch = self.pending.drain();
        let count = batch.len();
        for command in batch {
            if let Err(err) = self.run_command(command) {
                debug!(?command, %err, "table command abandoned");
            }
        }
        count
    }

    fn run_command(&mut self, command: TableCommand) -> Result<()> {
        match command {
            TableCommand::StopEditing => {
                if self.editing.is_some() {
                    self.finish_edit(false)?;
                }
                Ok(())
            }
            TableCommand::Traverse(direction) => {
                if self.editing.is_some() {
                    self.finish_edit(false)?;
                }
                let extent = self.extent();
                let result = match self.selection {
                    Some(from) => traversal::traverse(from, extent, &self.mode, &*self, direction),
                    None => {
                        let origin = match direction {
                            Direction::Next => Some(GridPosition::new(0, 0)),
                            Direction::Previous => extent.last(),
                        };
                        match origin {
                            Some(origin) => {
                                traversal::seek(origin, extent, &self.mode, &*self, direction)
                            }
                            None => TraversalResult::NotFound,
                        }
                    }
                };
                self.apply_traversal(result, direction)
            }
            TableCommand::Seek { target, direction } => {
                if self.editing.is_some() {
                    self.finish_edit(false)?;
                }
                let result = traversal::seek(target, self.extent(), &self.mode, &*self, direction);
                self.apply_traversal(result, direction)
            }
        }
    }

    fn apply_traversal(&mut self, result: TraversalResult, direction: Direction) -> Result<()> {
        match result {
            TraversalResult::Found {
                position,
                begin_edit,
            } => {
                debug!(cell = %position, begin_edit, "traversal landed");
                self.select(position)?;
                if begin_edit && self.is_editable(position) {
                    self.begin_edit(position)?;
                }
                Ok(())
            }
            TraversalResult::NotFound => {
                debug!(from = ?self.selection, ?direction, "traversal exhausted");
                self.events.push(TableEvent::TraversalExhausted {
                    from: self.selection,
                    direction,
                });
                Ok(())
            }
        }
    }

    pub(crate) fn finish_edit(&mut self, advance: bool) -> Result<GridPosition> {
        let session = self.editing.as_ref().ok_or(FormGridError::NoActiveEdit)?;
        let position = session.position;
        let new = match self.columns.get(position.col).map(|c| &c.editor) {
            Some(ColumnEditor::Date(interpreter)) => match interpreter.interpret(&session.buffer) {
                Ok(Some(value)) => interpreter.format(&value),
                Ok(None) => String::new(),
                Err(failure) => {
                    let offset = failure.error_offset;
                    debug!(cell = %position, offset, "edit rejected");
                    self.events.push(TableEvent::EditRejected { position, offset });
                    return Err(FormGridError::InvalidDate { offset });
                }
            },
            _ => session.buffer.clone(),
        };

        self.editing = None;
        let old = if new.is_empty() {
            self.cells.remove(&position)
        } else {
            self.cells.insert(position, new.clone())
        };
        debug!(cell = %position, value = %new, "edit committed");
        self.events.push(TableEvent::EditCommitted { position, old, new });
        if advance {
            self.post(TableCommand::Traverse(Direction::Next));
        }
        Ok(position)
    }

    /// Move a column to a new display position, carrying its cells along.
    ///
    /// Refused while a merged span covers any column that would shift.
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<()> {
        let cols = self.columns.len();
        if from >= cols || to >= cols {
            return Err(FormGridError::OutOfBounds(GridPosition::new(0, from.max(to))));
        }
        if from == to {
            return Ok(());
        }
        let (lo, hi) = (from.min(to), from.max(to));
        if let Some(span) = self.spans.iter().find(|s| (lo..=hi).any(|c| s.covers_col(c))) {
            return Err(FormGridError::SpanOverlap {
                anchor: span.anchor,
            });
        }
        if self.editing.is_some() {
            self.finish_edit(false)?;
        }

        let remap = |col: usize| {
            if col == from {
                to
            } else if from < to && col > from && col <= to {
                col - 1
            } else if to < from && col >= to && col < from {
                col + 1
            } else {
                col
            }
        };
        let column = self.columns.remove(from);
        self.columns.insert(to, column);
        self.cells = std::mem::take(&mut self.cells)
            .into_iter()
            .map(|(pos, text)| (GridPosition::new(pos.row, remap(pos.col)), text))
            .collect();
        self.locked = std::mem::take(&mut self.locked)
            .into_iter()
            .map(|pos| GridPosition::new(pos.row, remap(pos.col)))
            .collect();
        self.selection = self
            .selection
            .map(|pos| GridPosition::new(pos.row, remap(pos.col)));
        debug!(from, to, "column moved");
        Ok(())
    }
}
