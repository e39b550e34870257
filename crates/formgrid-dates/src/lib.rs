//! formgrid_dates - Pattern-driven date parsing and shortcut interpretation.

pub mod dates;
pub mod error;

pub use dates::{
    CenturyPivot, DateLocale, DatePattern, ParseOutcome, RawInput, ReferenceContext,
    ShortcutInterpreter, interpret,
};
pub use error::{ParseFailure, PatternError};
