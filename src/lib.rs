//! formgrid - Form-aware data entry core.
//!
//! - [`dates`] - Pattern-driven date parsing and the shortcut interpreter
//! - [`grid`] - Cell traversal, the form table model and date fields

pub use formgrid_core as grid;
pub use formgrid_dates as dates;

pub use formgrid_core::config::{Settings, load_settings};
pub use formgrid_core::{
    Axis, CellPredicate, DateField, Direction, FormGridError, FormTable, GridExtent, GridPosition,
    TableCommand, TableEvent, TraversalMode, TraversalResult,
};
pub use formgrid_dates::{
    CenturyPivot, DatePattern, ParseFailure, RawInput, ReferenceContext, ShortcutInterpreter,
    interpret,
};
