//! Shortcut grammar: `17`, `+3d`, `-24h`, `6y`, ...
//!
//! A bare number *sets* one field of the reference timestamp and resets every
//! finer field. A signed number *adds* to a field; day, week, month and year
//! additions also reset the time of day, so `-1d` and `-24h` differ.

use super::century::CenturyPivot;
use super::pattern::DatePattern;
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use regex::Regex;
use std::sync::OnceLock;

const UNIT_LETTERS: [char; 12] = ['s', 'S', 'm', 'M', 'h', 'H', 'd', 'D', 'w', 'W', 'y', 'Y'];

/// Pattern letters consulted, in order, when the shortcut has no unit letter.
const INFERENCE_ORDER: [(char, ShortcutUnit); 7] = [
    ('s', ShortcutUnit::Second),
    ('m', ShortcutUnit::Minute),
    ('h', ShortcutUnit::Hour12),
    ('H', ShortcutUnit::Hour),
    ('d', ShortcutUnit::Day),
    ('M', ShortcutUnit::Month),
    ('y', ShortcutUnit::Year),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShortcutMode {
    Set,
    Add,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShortcutUnit {
    Second,
    Minute,
    /// Hour on a 12-hour clock; setting it keeps the reference's AM/PM half.
    Hour12,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl ShortcutUnit {
    fn from_letter(letter: char, pattern: &DatePattern) -> Option<ShortcutUnit> {
        Some(match letter {
            's' | 'S' => ShortcutUnit::Second,
            // Without minutes in the pattern a lowercase m can only mean months.
            'm' if pattern.contains_field('m') => ShortcutUnit::Minute,
            'm' | 'M' => ShortcutUnit::Month,
            'h' | 'H' => ShortcutUnit::Hour,
            'd' | 'D' => ShortcutUnit::Day,
            'w' | 'W' => ShortcutUnit::Week,
            'y' | 'Y' => ShortcutUnit::Year,
            _ => return None,
        })
    }

    fn infer(pattern: &DatePattern) -> Option<ShortcutUnit> {
        INFERENCE_ORDER
            .iter()
            .find(|(letter, _)| pattern.contains_field(*letter))
            .map(|(_, unit)| *unit)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shortcut {
    pub mode: ShortcutMode,
    pub amount: i64,
    pub unit: ShortcutUnit,
}

/// Whether `text` looks like a shortcut at all. Shaped text may still fail
/// to parse (`5 May` ends in a unit letter).
pub fn is_shortcut_shaped(text: &str) -> bool {
    let short_number = !text.is_empty()
        && text.chars().count() <= 2
        && text.chars().all(|c| c.is_ascii_digit());
    text.starts_with(['+', '-']) || short_number || text.ends_with(UNIT_LETTERS)
}

fn shortcut_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<sign>[+-])?(?<amount>[0-9]{1,9})(?<unit>[sSmMhHdDwWyY])?$")
            .expect("shortcut regex must compile")
    })
}

impl Shortcut {
    pub fn parse(text: &str, pattern: &DatePattern) -> Option<Shortcut> {
        let caps = shortcut_re().captures(text)?;
        let mut amount: i64 = caps["amount"].parse().ok()?;
        let mode = match caps.name("sign").map(|m| m.as_str()) {
            Some("-") => {
                amount = -amount;
                ShortcutMode::Add
            }
            Some(_) => ShortcutMode::Add,
            None => ShortcutMode::Set,
        };
        let unit = match caps.name("unit").and_then(|m| m.as_str().chars().next()) {
            Some(letter) => ShortcutUnit::from_letter(letter, pattern)?,
            None => ShortcutUnit::infer(pattern)?,
        };
        Some(Shortcut { mode, amount, unit })
    }

    /// Apply to `reference`. `None` when the result is out of range.
    pub fn apply(
        &self,
        reference: NaiveDateTime,
        pattern: &DatePattern,
        pivot: &CenturyPivot,
    ) -> Option<NaiveDateTime> {
        match self.mode {
            ShortcutMode::Set => self.set(reference, pattern, pivot),
            ShortcutMode::Add => self.add(reference),
        }
    }

    fn set(
        &self,
        reference: NaiveDateTime,
        pattern: &DatePattern,
        pivot: &CenturyPivot,
    ) -> Option<NaiveDateTime> {
        let date = reference.date();
        let value = u32::try_from(self.amount).ok()?;
        match self.unit {
            ShortcutUnit::Second => date.and_hms_opt(reference.hour(), reference.minute(), value),
            ShortcutUnit::Minute => date.and_hms_opt(reference.hour(), value, 0),
            ShortcutUnit::Hour => date.and_hms_opt(value, 0, 0),
            ShortcutUnit::Hour12 => {
                if !(1..=12).contains(&value) {
                    return None;
                }
                let half = if reference.hour() >= 12 { 12 } else { 0 };
                date.and_hms_opt(value % 12 + half, 0, 0)
            }
            ShortcutUnit::Day => date.with_day(value).and_then(midnight),
            ShortcutUnit::Week => pattern
                .locale()
                .week
                .week_start(date.year(), value)
                .and_then(midnight),
            ShortcutUnit::Month => NaiveDate::from_ymd_opt(date.year(), value, 1).and_then(midnight),
            ShortcutUnit::Year => {
                let year = i32::try_from(value).ok()?;
                NaiveDate::from_ymd_opt(pivot.expand(year), 1, 1).and_then(midnight)
            }
        }
    }

    /// Offset `reference` by the amount.
    ///
    /// The rule for calendar units depends on the sign on purpose: `+3d` keeps
    /// the clock time, `-1d` means the start of yesterday. `-24h` keeps it.
    fn add(&self, reference: NaiveDateTime) -> Option<NaiveDateTime> {
        let n = self.amount;
        let base = if n < 0 { midnight(reference.date())? } else { reference };
        match self.unit {
            ShortcutUnit::Second => reference.checked_add_signed(TimeDelta::try_seconds(n)?),
            ShortcutUnit::Minute => reference.checked_add_signed(TimeDelta::try_minutes(n)?),
            ShortcutUnit::Hour | ShortcutUnit::Hour12 => {
                reference.checked_add_signed(TimeDelta::try_hours(n)?)
            }
            ShortcutUnit::Day => base.checked_add_signed(TimeDelta::try_days(n)?),
            ShortcutUnit::Week => base.checked_add_signed(TimeDelta::try_weeks(n)?),
            ShortcutUnit::Month => add_months(base, n),
            ShortcutUnit::Year => add_months(base, n.checked_mul(12)?),
        }
    }
}

fn midnight(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
}

fn add_months(value: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let count = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        value.checked_add_months(count)
    } else {
        value.checked_sub_months(count)
    }
}
