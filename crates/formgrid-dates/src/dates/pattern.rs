//! Date/time patterns.
//!
//! Patterns use the classic letter syntax (`MM/dd/yy HH:mm`). Parsing works on
//! characters rather than bytes so failure offsets can be used directly as
//! caret positions in a text field.
//!
//! | letter | field                     |
//! |--------|---------------------------|
//! | `y`    | year (`yy` = two digits)  |
//! | `M`    | month (`MMM` short name, `MMMM` long name) |
//! | `d`    | day of month              |
//! | `E`    | weekday name (ignored on parse) |
//! | `a`    | AM/PM marker              |
//! | `H`    | hour 0-23                 |
//! | `h`    | hour 1-12                 |
//! | `m`    | minute                    |
//! | `s`    | second                    |
//! | `S`    | millisecond               |

use super::locale::DateLocale;
use crate::error::PatternError;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use std::fmt;
use std::str::FromStr;

/// Upper bound on digits consumed by a greedy numeric field.
const MAX_DIGITS: usize = 9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Year,
    Month,
    Day,
    Weekday,
    AmPm,
    Hour24,
    Hour12,
    Minute,
    Second,
    Millis,
}

impl Field {
    fn from_letter(c: char) -> Option<Field> {
        Some(match c {
            'y' => Field::Year,
            'M' => Field::Month,
            'd' => Field::Day,
            'E' => Field::Weekday,
            'a' => Field::AmPm,
            'H' => Field::Hour24,
            'h' => Field::Hour12,
            'm' => Field::Minute,
            's' => Field::Second,
            'S' => Field::Millis,
            _ => return None,
        })
    }

    pub fn letter(self) -> char {
        match self {
            Field::Year => 'y',
            Field::Month => 'M',
            Field::Day => 'd',
            Field::Weekday => 'E',
            Field::AmPm => 'a',
            Field::Hour24 => 'H',
            Field::Hour12 => 'h',
            Field::Minute => 'm',
            Field::Second => 's',
            Field::Millis => 'S',
        }
    }

    fn is_numeric(self, width: usize) -> bool {
        match self {
            Field::Month => width <= 2,
            Field::Weekday | Field::AmPm => false,
            _ => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Field { field: Field, width: usize },
    Literal(String),
}

/// Field values read from text, before they are combined into a timestamp.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedFields {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour24: Option<u32>,
    pub hour12: Option<u32>,
    pub pm: Option<bool>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    pub millis: Option<u32>,
    /// Number of characters consumed from the input.
    pub consumed: usize,
    calendar_offset: usize,
}

impl ParsedFields {
    /// Combine the fields into a timestamp. Missing fields take their epoch
    /// values (`1970-01-01 00:00:00.000`).
    ///
    /// On an impossible calendar date the error is the offset of the field
    /// most likely at fault.
    pub fn resolve(&self) -> Result<NaiveDateTime, usize> {
        let date = NaiveDate::from_ymd_opt(
            self.year.unwrap_or(1970),
            self.month.unwrap_or(1),
            self.day.unwrap_or(1),
        )
        .ok_or(self.calendar_offset)?;
        date.and_hms_milli_opt(
            self.hour_of_day(),
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
            self.millis.unwrap_or(0),
        )
        .ok_or(self.calendar_offset)
    }

    pub fn hour_of_day(&self) -> u32 {
        if let Some(hour) = self.hour24 {
            return hour;
        }
        let half = if self.pm == Some(true) { 12 } else { 0 };
        self.hour12.map_or(0, |h| h % 12) + half
    }

    /// Store a numeric value, returning `None` when out of range.
    fn store(&mut self, field: Field, value: u32) -> Option<()> {
        let in_range = |lo: u32, hi: u32| (lo..=hi).contains(&value).then_some(value);
        match field {
            Field::Year => self.year = Some(i32::try_from(value).ok()?),
            Field::Month => self.month = Some(in_range(1, 12)?),
            Field::Day => self.day = Some(in_range(1, 31)?),
            Field::Hour24 => self.hour24 = Some(in_range(0, 23)?),
            Field::Hour12 => self.hour12 = Some(in_range(1, 12)?),
            Field::Minute => self.minute = Some(in_range(0, 59)?),
            Field::Second => self.second = Some(in_range(0, 59)?),
            Field::Millis => self.millis = Some(in_range(0, 999)?),
            Field::Weekday | Field::AmPm => {}
        }
        Some(())
    }
}

/// A compiled date/time pattern.
#[derive(Clone, Debug)]
pub struct DatePattern {
    source: String,
    tokens: Vec<Token>,
    locale: DateLocale,
    delimiters: Vec<char>,
    delimiter_sequence: Vec<char>,
}

impl DatePattern {
    pub fn new(pattern: &str) -> Result<DatePattern, PatternError> {
        Self::with_locale(pattern, DateLocale::default())
    }

    pub fn with_locale(pattern: &str, locale: DateLocale) -> Result<DatePattern, PatternError> {
        let tokens = tokenize(pattern)?;
        let delimiter_sequence: Vec<char> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Literal(text) => Some(text.chars()),
                Token::Field { .. } => None,
            })
            .flatten()
            .filter(|c| !c.is_alphanumeric())
            .collect();
        let mut delimiters = Vec::new();
        for c in &delimiter_sequence {
            if !delimiters.contains(c) {
                delimiters.push(*c);
            }
        }

        Ok(DatePattern {
            source: pattern.to_string(),
            tokens,
            locale,
            delimiters,
            delimiter_sequence,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn locale(&self) -> &DateLocale {
        &self.locale
    }

    /// Distinct non-alphanumeric literal characters, in pattern order.
    pub fn delimiters(&self) -> &[char] {
        &self.delimiters
    }

    pub fn is_delimiter(&self, c: char) -> bool {
        self.delimiters.contains(&c)
    }

    /// Every non-alphanumeric literal character in pattern order, repeats kept.
    pub fn delimiter_sequence(&self) -> &[char] {
        &self.delimiter_sequence
    }

    /// Whether the pattern uses the field written with `letter`.
    pub fn contains_field(&self, letter: char) -> bool {
        self.tokens
            .iter()
            .any(|t| matches!(t, Token::Field { field, .. } if field.letter() == letter))
    }

    /// Parse fields from the start of `text`. The input does not have to be
    /// consumed completely; check [`ParsedFields::consumed`].
    ///
    /// The error value is the character offset where parsing failed.
    pub fn parse_fields(&self, text: &str) -> Result<ParsedFields, usize> {
        let chars: Vec<char> = text.chars().collect();
        let mut fields = ParsedFields::default();
        let mut pos = 0;

        for (idx, token) in self.tokens.iter().enumerate() {
            match token {
                Token::Literal(literal) => {
                    for expected in literal.chars() {
                        if chars.get(pos) != Some(&expected) {
                            return Err(pos);
                        }
                        pos += 1;
                    }
                }
                Token::Field { field, width } if field.is_numeric(*width) => {
                    let abutting = matches!(
                        self.tokens.get(idx + 1),
                        Some(Token::Field { field: next, width: w }) if next.is_numeric(*w)
                    );
                    let max = if abutting { *width } else { MAX_DIGITS };
                    let start = pos;
                    let mut end = pos;
                    while end < chars.len() && end - start < max && chars[end].is_ascii_digit() {
                        end += 1;
                    }
                    if end == start {
                        return Err(start);
                    }
                    let digits: String = chars[start..end].iter().collect();
                    let value: u32 = digits.parse().map_err(|_| start)?;
                    fields.store(*field, value).ok_or(start)?;
                    if matches!(field, Field::Year | Field::Month | Field::Day) {
                        if *field == Field::Day || fields.day.is_none() {
                            fields.calendar_offset = start;
                        }
                    }
                    pos = end;
                }
                Token::Field { field, .. } => {
                    let rest = &chars[pos.min(chars.len())..];
                    let matched = match field {
                        Field::Month => self.locale.match_month(rest).map(|(month0, len)| {
                            fields.month = Some(month0 as u32 + 1);
                            if fields.day.is_none() {
                                fields.calendar_offset = pos;
                            }
                            len
                        }),
                        Field::Weekday => self.locale.match_weekday(rest).map(|(_, len)| len),
                        Field::AmPm => self.locale.match_am_pm(rest).map(|(pm, len)| {
                            fields.pm = Some(pm);
                            len
                        }),
                        _ => None,
                    };
                    pos += matched.ok_or(pos)?;
                }
            }
        }

        fields.consumed = pos;
        Ok(fields)
    }

    /// Parse the whole of `text`. Trailing characters fail at their offset.
    pub fn parse(&self, text: &str) -> Result<NaiveDateTime, usize> {
        let fields = self.parse_fields(text)?;
        if fields.consumed < text.chars().count() {
            return Err(fields.consumed);
        }
        fields.resolve()
    }

    pub fn format(&self, value: &NaiveDateTime) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(literal) => out.push_str(literal),
                Token::Field { field, width } => self.format_field(&mut out, value, *field, *width),
            }
        }
        out
    }

    fn format_field(&self, out: &mut String, value: &NaiveDateTime, field: Field, width: usize) {
        let pad = |n: i64| format!("{:0width$}", n, width = width);
        let text = match field {
            Field::Year if width == 2 => format!("{:02}", value.year().rem_euclid(100)),
            Field::Year => pad(i64::from(value.year())),
            Field::Month if width >= 4 => self.locale.month_name(value.month0() as usize).into(),
            Field::Month if width == 3 => {
                self.locale.short_month_name(value.month0() as usize).into()
            }
            Field::Month => pad(i64::from(value.month())),
            Field::Day => pad(i64::from(value.day())),
            Field::Weekday if width >= 4 => self.locale.weekday_name(value.weekday()).into(),
            Field::Weekday => self.locale.short_weekday_name(value.weekday()).into(),
            Field::AmPm => self.locale.am_pm(value.hour() >= 12).into(),
            Field::Hour24 => pad(i64::from(value.hour())),
            Field::Hour12 => {
                let hour = value.hour() % 12;
                pad(i64::from(if hour == 0 { 12 } else { hour }))
            }
            Field::Minute => pad(i64::from(value.minute())),
            Field::Second => pad(i64::from(value.second())),
            Field::Millis => pad(i64::from((value.nanosecond() / 1_000_000).min(999))),
        };
        out.push_str(&text);
    }
}

impl PartialEq for DatePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.locale == other.locale
    }
}

impl FromStr for DatePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatePattern::new(s)
    }
}

impl fmt::Display for DatePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn tokenize(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                literal.push('\'');
                i += 2;
                continue;
            }
            let mut j = i + 1;
            loop {
                match chars.get(j) {
                    None => return Err(PatternError::UnterminatedQuote(i)),
                    Some('\'') if chars.get(j + 1) == Some(&'\'') => {
                        literal.push('\'');
                        j += 2;
                    }
                    Some('\'') => {
                        j += 1;
                        break;
                    }
                    Some(&quoted) => {
                        literal.push(quoted);
                        j += 1;
                    }
                }
            }
            i = j;
        } else if c.is_ascii_alphabetic() {
            let field = Field::from_letter(c).ok_or(PatternError::UnknownField(c))?;
            let mut width = 1;
            while chars.get(i + width) == Some(&c) {
                width += 1;
            }
            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(Token::Field { field, width });
            i += width;
        } else {
            literal.push(c);
            i += 1;
        }
    }
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }

    if !tokens.iter().any(|t| matches!(t, Token::Field { .. })) {
        return Err(PatternError::NoFields);
    }
    Ok(tokens)
}
