//! Error types for date patterns and interpretation.

use thiserror::Error;

/// Errors raised while compiling a date/time pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Unknown pattern letter '{0}'")]
    UnknownField(char),

    #[error("Unterminated quote starting at offset {0}")]
    UnterminatedQuote(usize),

    #[error("Pattern contains no date or time fields")]
    NoFields,
}

/// Input that could not be interpreted as a date.
///
/// `error_offset` is a character index into the text the caller supplied,
/// suitable for re-seating a caret.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Unparseable date at offset {error_offset}")]
pub struct ParseFailure {
    pub error_offset: usize,
}
