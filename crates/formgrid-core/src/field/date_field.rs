//! A date entry field.
//!
//! Holds the typed text separately from the committed value. Committing
//! interprets the text; on success the text is rewritten in the pattern's
//! format, on failure the caret jumps to the offending character.

use crate::error::{FormGridError, Result};
use chrono::NaiveDateTime;
use formgrid_dates::ShortcutInterpreter;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct DateField {
    interpreter: ShortcutInterpreter,
    text: String,
    /// Caret position in characters
    caret: usize,
    value: Option<NaiveDateTime>,
}

impl DateField {
    pub fn new(interpreter: ShortcutInterpreter) -> Self {
        DateField {
            interpreter,
            text: String::new(),
            caret: 0,
            value: None,
        }
    }

    pub fn interpreter(&self) -> &ShortcutInterpreter {
        &self.interpreter
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn value(&self) -> Option<NaiveDateTime> {
        self.value
    }

    /// Replace the typed text; the caret moves to its end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.caret = self.text.chars().count();
    }

    pub fn set_caret(&mut self, caret: usize) {
        self.caret = caret.min(self.text.chars().count());
    }

    pub fn set_value(&mut self, value: Option<NaiveDateTime>) {
        self.value = value;
        self.text = value
            .map(|v| self.interpreter.format(&v))
            .unwrap_or_default();
        self.caret = self.text.chars().count();
    }

    /// Whether the text differs from what the committed value displays as.
    pub fn is_dirty(&self) -> bool {
        let shown = self
            .value
            .map(|v| self.interpreter.format(&v))
            .unwrap_or_default();
        shown != self.text
    }

    /// Interpret the text and store the result.
    pub fn commit(&mut self) -> Result<Option<NaiveDateTime>> {
        match self.interpreter.interpret(&self.text) {
            Ok(value) => {
                debug!(text = %self.text, ?value, "date field committed");
                self.set_value(value);
                Ok(value)
            }
            Err(failure) => {
                self.set_caret(failure.error_offset);
                debug!(text = %self.text, offset = failure.error_offset, "date field rejected input");
                Err(FormGridError::InvalidDate {
                    offset: failure.error_offset,
                })
            }
        }
    }
}
