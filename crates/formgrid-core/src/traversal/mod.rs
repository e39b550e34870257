//! Spreadsheet-style cell traversal.
//!
//! - [`GridPosition`], [`GridExtent`] - Cell coordinates and grid size
//! - [`TraversalMode`], [`Axis`] - Stepping and wrap policy
//! - [`CellPredicate`] - Editability/visibility supplied by the caller
//! - [`next`], [`previous`], [`seek`] - The traversal engine itself
//!
//! The engine is pure: it only computes where to go. Applying the move is the
//! caller's job, see [`crate::table::FormTable::process_pending`].

mod engine;
mod mode;
mod position;

pub use engine::{
    CellPredicate, FnPredicate, TraversalResult, accepts, next, previous, seek, traverse,
};
pub use mode::{Axis, Direction, TraversalMode};
pub use position::{GridExtent, GridPosition};
