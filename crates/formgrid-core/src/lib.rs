//! formgrid-core - UI-agnostic form table model, cell traversal and form fields.

pub mod config;
pub mod error;
pub mod field;
pub mod storage;
pub mod table;
pub mod traversal;

pub use error::{FormGridError, Result};
pub use field::DateField;
pub use table::{FormTable, TableCommand, TableEvent};
pub use traversal::{
    Axis, CellPredicate, Direction, GridExtent, GridPosition, TraversalMode, TraversalResult,
};
