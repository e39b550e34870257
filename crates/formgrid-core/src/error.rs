//! Error types for formgrid core.

use crate::traversal::GridPosition;
use formgrid_dates::PatternError;
use thiserror::Error;

/// Errors that can occur in the form table, fields and storage
#[derive(Error, Debug)]
pub enum FormGridError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Could not serialize TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Invalid date pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("Invalid date at offset {offset}")]
    InvalidDate { offset: usize },

    #[error("Cell {0} is outside the table")]
    OutOfBounds(GridPosition),

    #[error("Span at {anchor} overlaps an existing span")]
    SpanOverlap { anchor: GridPosition },

    #[error("Cell {0} is not editable")]
    NotEditable(GridPosition),

    #[error("No edit in progress")]
    NoActiveEdit,

    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}

pub type Result<T> = std::result::Result<T, FormGridError>;
