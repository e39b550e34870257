//! Interpretation of typed date text.
//!
//! The active pattern doubles as the grammar. Each attempt tries, in order:
//!
//! 1. the shortcut grammar (`+3d`, `17`, `6y`),
//! 2. a parse against the pattern, expanding two-digit years,
//! 3. a recovery cascade that either rewrites the text and retries
//!    (append the current year, synthesize delimiters) or resolves it
//!    directly (bare clock time, date-only text against a timestamp pattern).
//!
//! Rewrites are bounded: at most [`MAX_ATTEMPTS`] passes are made.

use super::century::CenturyPivot;
use super::pattern::{DatePattern, ParsedFields};
use super::shortcut::{Shortcut, is_shortcut_shaped};
use crate::error::ParseFailure;
use chrono::{Local, NaiveDateTime, NaiveTime};
use tracing::{debug, trace};

/// Number of passes over (possibly rewritten) text before giving up.
pub const MAX_ATTEMPTS: usize = 3;

const SHORT_TIME_PATTERN: &str = "HH:mm";
const LONG_TIME_PATTERN: &str = "HH:mm:ss";
const MIDNIGHT_SUFFIX: &str = " 00:00:00";

/// `Ok(None)` for blank input, `Ok(Some(_))` for a resolved timestamp.
pub type ParseOutcome = Result<Option<NaiveDateTime>, ParseFailure>;

/// Text as typed into a field, plus the mask filler to strip from it.
#[derive(Clone, Copy, Debug)]
pub struct RawInput<'a> {
    pub text: &'a str,
    pub filler: Option<char>,
}

impl<'a> RawInput<'a> {
    pub fn new(text: &'a str) -> Self {
        RawInput { text, filler: None }
    }

    pub fn with_filler(mut self, filler: char) -> Self {
        self.filler = Some(filler);
        self
    }

    /// Filler removed and whitespace trimmed. Also returns, for every
    /// character of the cleaned text plus its end, the matching character
    /// index in the raw text.
    fn cleaned(&self) -> (String, Vec<usize>) {
        let kept: Vec<(usize, char)> = self
            .text
            .chars()
            .enumerate()
            .filter(|(_, c)| Some(*c) != self.filler)
            .collect();
        let start = kept.iter().position(|(_, c)| !c.is_whitespace());
        let end = kept.iter().rposition(|(_, c)| !c.is_whitespace());
        let kept = match (start, end) {
            (Some(start), Some(end)) => &kept[start..=end],
            _ => &kept[..0],
        };
        let mut raw_index: Vec<usize> = kept.iter().map(|(idx, _)| *idx).collect();
        raw_index.push(kept.last().map_or(0, |(idx, _)| idx + 1));
        (kept.iter().map(|(_, c)| *c).collect(), raw_index)
    }
}

/// Everything interpretation depends on besides the text itself.
#[derive(Clone, Debug)]
pub struct ReferenceContext {
    reference: Option<NaiveDateTime>,
    pattern: DatePattern,
    pivot: CenturyPivot,
}

impl ReferenceContext {
    /// Context relative to "now", using the process-wide century pivot.
    pub fn new(pattern: DatePattern) -> Self {
        ReferenceContext {
            reference: None,
            pattern,
            pivot: CenturyPivot::process(),
        }
    }

    pub fn with_reference(mut self, reference: NaiveDateTime) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn with_pivot(mut self, pivot: CenturyPivot) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn pattern(&self) -> &DatePattern {
        &self.pattern
    }

    pub fn pivot(&self) -> &CenturyPivot {
        &self.pivot
    }

    pub fn reference(&self) -> Option<NaiveDateTime> {
        self.reference
    }

    /// The configured reference, or the local wall clock.
    pub fn now(&self) -> NaiveDateTime {
        self.reference
            .unwrap_or_else(|| Local::now().naive_local())
    }
}

/// Interpret `input` against `context`.
pub fn interpret(input: RawInput<'_>, context: &ReferenceContext) -> ParseOutcome {
    interpret_within(input, context, MAX_ATTEMPTS)
}

fn interpret_within(
    input: RawInput<'_>,
    context: &ReferenceContext,
    max_attempts: usize,
) -> ParseOutcome {
    let (text, raw_index) = input.cleaned();
    if text.is_empty() {
        return Ok(None);
    }

    let now = context.now();
    let mut chars = text.chars();
    if let (Some(only), None) = (chars.next(), chars.next()) {
        if context.pattern.is_delimiter(only) {
            return Ok(Some(now));
        }
    }
    // An untouched mask such as "__/__/__" leaves only its delimiters.
    if input.filler.is_some() && text.chars().all(|c| context.pattern.is_delimiter(c)) {
        return Ok(None);
    }

    let walk = Walk {
        context,
        now,
        raw_index,
        max_attempts,
    };
    let outcome = walk.run(&text, 1, None);
    debug!(input = %text, ?outcome, "interpreted date input");
    outcome.map(Some)
}

enum Step {
    Done(Result<NaiveDateTime, usize>),
    /// Try again with rewritten text. Carries the failure offset of this pass.
    Retry(String, usize),
}

struct Walk<'a> {
    context: &'a ReferenceContext,
    now: NaiveDateTime,
    /// Cleaned character index to raw character index, end included
    raw_index: Vec<usize>,
    max_attempts: usize,
}

impl Walk<'_> {
    fn run(
        &self,
        text: &str,
        depth: usize,
        first_offset: Option<usize>,
    ) -> Result<NaiveDateTime, ParseFailure> {
        match self.attempt(text.trim()) {
            Step::Done(Ok(value)) => Ok(value),
            Step::Done(Err(offset)) => Err(self.failure(first_offset.unwrap_or(offset))),
            Step::Retry(next, offset) => {
                let first = first_offset.unwrap_or(offset);
                if depth >= self.max_attempts {
                    trace!(text = %next, "retry budget exhausted");
                    return Err(self.failure(first));
                }
                trace!(from = %text, to = %next, depth, "rewrote date input");
                self.run(&next, depth + 1, Some(first))
            }
        }
    }

    /// Offsets past the cleaned text point at its end.
    fn failure(&self, offset: usize) -> ParseFailure {
        let error_offset = self
            .raw_index
            .get(offset)
            .or(self.raw_index.last())
            .copied()
            .unwrap_or(offset);
        ParseFailure { error_offset }
    }

    fn attempt(&self, text: &str) -> Step {
        let pattern = &self.context.pattern;

        if is_shortcut_shaped(text) {
            let resolved = Shortcut::parse(text, pattern)
                .and_then(|s| s.apply(self.now, pattern, &self.context.pivot));
            if let Some(value) = resolved {
                return Step::Done(Ok(value));
            }
            trace!(text, "shortcut branch did not match");
        }

        let len = text.chars().count();
        let offset = match pattern.parse_fields(text) {
            Ok(fields) if fields.consumed == len => match self.resolve(fields) {
                Ok(value) => return Step::Done(Ok(value)),
                Err(offset) => offset,
            },
            Ok(fields) => fields.consumed,
            Err(offset) => offset,
        };
        trace!(text, offset, "pattern parse failed");
        self.recover(text, offset)
    }

    fn resolve(&self, mut fields: ParsedFields) -> Result<NaiveDateTime, usize> {
        if let Some(year) = fields.year.filter(|y| *y < 100) {
            fields.year = Some(self.context.pivot.expand(year));
        }
        fields.resolve()
    }

    fn recover(&self, text: &str, offset: usize) -> Step {
        let pattern = &self.context.pattern;
        let len = text.chars().count();
        let year = self.context.pivot.current_year;

        // "01/05/" -> "01/05/<year>"
        let ends_in_delimiter = text.chars().last().is_some_and(|c| pattern.is_delimiter(c));
        if offset == len && ends_in_delimiter {
            return Step::Retry(format!("{text}{year}"), offset);
        }

        // "0105" -> "01/05/<year>"; clock text is left for the time branch.
        if !is_clock_text(text) && !text.chars().any(|c| pattern.is_delimiter(c)) {
            if let Some(rewritten) = self.synthesize_delimiters(text) {
                return Step::Retry(rewritten, offset);
            }
        }

        if is_clock_text(text) {
            if let Some(value) = self.parse_clock(text) {
                return Step::Done(Ok(value));
            }
        }

        let padded = format!("{text}{MIDNIGHT_SUFFIX}");
        if let Ok(fields) = pattern.parse_fields(&padded) {
            if fields.consumed >= len {
                if let Ok(value) = self.resolve(fields) {
                    return Step::Done(Ok(value));
                }
            }
        }

        Step::Done(Err(offset))
    }

    /// Insert the pattern's delimiters after every two characters.
    fn synthesize_delimiters(&self, text: &str) -> Option<String> {
        let sequence = self.context.pattern.delimiter_sequence();
        let mut out = String::with_capacity(text.len() + sequence.len() + 4);
        let mut used = 0;
        for (idx, c) in text.chars().enumerate() {
            out.push(c);
            if (idx + 1) % 2 == 0 && used < sequence.len() {
                out.push(sequence[used]);
                used += 1;
            }
        }
        if used == 0 {
            return None;
        }
        if out.chars().count() == 6 {
            out.push_str(&self.context.pivot.current_year.to_string());
        }
        Some(out)
    }

    fn parse_clock(&self, text: &str) -> Option<NaiveDateTime> {
        let source = match text.matches(':').count() {
            1 => SHORT_TIME_PATTERN,
            2 => LONG_TIME_PATTERN,
            _ => return None,
        };
        let fields = DatePattern::new(source).ok()?.parse_fields(text).ok()?;
        if fields.consumed != text.chars().count() {
            return None;
        }
        let time = NaiveTime::from_hms_opt(
            fields.hour_of_day(),
            fields.minute.unwrap_or(0),
            fields.second.unwrap_or(0),
        )?;
        Some(self.now.date().and_time(time))
    }
}

fn is_clock_text(text: &str) -> bool {
    text.contains(':') && text.chars().all(|c| c.is_ascii_digit() || c == ':')
}

/// Interpreter bound to one context and filler, as held by a form field.
#[derive(Clone, Debug)]
pub struct ShortcutInterpreter {
    context: ReferenceContext,
    filler: Option<char>,
}

impl ShortcutInterpreter {
    pub fn new(context: ReferenceContext) -> Self {
        ShortcutInterpreter {
            context,
            filler: None,
        }
    }

    pub fn with_filler(mut self, filler: char) -> Self {
        self.filler = Some(filler);
        self
    }

    pub fn context(&self) -> &ReferenceContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ReferenceContext {
        &mut self.context
    }

    pub fn filler(&self) -> Option<char> {
        self.filler
    }

    pub fn interpret(&self, text: &str) -> ParseOutcome {
        let input = RawInput {
            text,
            filler: self.filler,
        };
        interpret(input, &self.context)
    }

    pub fn format(&self, value: &NaiveDateTime) -> String {
        self.context.pattern.format(value)
    }
}
