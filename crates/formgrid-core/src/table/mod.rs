//! Form table state and logic (UI-agnostic).
//!
//! Moves and edits requested from inside host callbacks are queued as
//! [`TableCommand`]s and applied by [`FormTable::process_pending`], once per
//! turn of the host event loop.

mod ops;
mod queue;
mod spans;
mod state;

pub use queue::DeferredQueue;
pub use spans::{CellSpan, SpanModel};
pub use state::{ColumnEditor, ColumnSpec, EditSession, FormTable, TableCommand, TableEvent};
