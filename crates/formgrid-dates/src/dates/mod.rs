//! Date interpretation API.
//!
//! - [`DatePattern`] - Compiled date/time pattern (parse with error offsets, format)
//! - [`DateLocale`] - Month/weekday names and week numbering rules
//! - [`CenturyPivot`] - Two-digit year expansion
//! - [`Shortcut`] - The `+3d` / `17` / `6y` shortcut grammar
//! - [`interpret`] - Full interpretation of typed text against a [`ReferenceContext`]

mod century;
mod interpret;
mod locale;
mod pattern;
mod shortcut;

pub use century::CenturyPivot;
pub use interpret::{
    MAX_ATTEMPTS, ParseOutcome, RawInput, ReferenceContext, ShortcutInterpreter, interpret,
};
pub use locale::{DateLocale, LocaleName, WeekRules};
pub use pattern::{DatePattern, Field, ParsedFields};
pub use shortcut::{Shortcut, ShortcutMode, ShortcutUnit, is_shortcut_shaped};
