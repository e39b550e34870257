//! Locale data used by date patterns.
//!
//! Only English names are bundled; locales differ in their week numbering.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// Indexed by `Weekday::num_days_from_monday`.
const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const SHORT_WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const AM_PM: [&str; 2] = ["AM", "PM"];

/// How weeks of the year are numbered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeekRules {
    pub first_day: Weekday,
    /// Days of January a week must contain to count as week 1.
    pub minimal_days_in_first_week: u8,
}

impl WeekRules {
    /// First day of week `week` (1-based) of `year`.
    pub fn week_start(&self, year: i32, week: u32) -> Option<NaiveDate> {
        if !(1..=53).contains(&week) {
            return None;
        }
        let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let offset = (jan1.weekday().num_days_from_monday() + 7
            - self.first_day.num_days_from_monday())
            % 7;
        let mut start = jan1.checked_sub_days(Days::new(u64::from(offset)))?;
        if 7 - offset < u32::from(self.minimal_days_in_first_week) {
            start = start.checked_add_days(Days::new(7))?;
        }
        start.checked_add_days(Days::new(7 * u64::from(week - 1)))
    }
}

/// Named locale presets, as written in settings files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleName {
    #[default]
    Us,
    Iso,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateLocale {
    pub week: WeekRules,
}

impl DateLocale {
    /// Sunday-first weeks, week 1 contains January 1st.
    pub fn us() -> DateLocale {
        DateLocale {
            week: WeekRules {
                first_day: Weekday::Sun,
                minimal_days_in_first_week: 1,
            },
        }
    }

    /// Monday-first weeks, week 1 contains the first Thursday.
    pub fn iso() -> DateLocale {
        DateLocale {
            week: WeekRules {
                first_day: Weekday::Mon,
                minimal_days_in_first_week: 4,
            },
        }
    }

    pub fn named(name: LocaleName) -> DateLocale {
        match name {
            LocaleName::Us => DateLocale::us(),
            LocaleName::Iso => DateLocale::iso(),
        }
    }

    pub fn month_name(&self, month0: usize) -> &'static str {
        MONTHS[month0 % 12]
    }

    pub fn short_month_name(&self, month0: usize) -> &'static str {
        SHORT_MONTHS[month0 % 12]
    }

    pub fn weekday_name(&self, day: Weekday) -> &'static str {
        WEEKDAYS[day.num_days_from_monday() as usize]
    }

    pub fn short_weekday_name(&self, day: Weekday) -> &'static str {
        SHORT_WEEKDAYS[day.num_days_from_monday() as usize]
    }

    pub fn am_pm(&self, pm: bool) -> &'static str {
        AM_PM[usize::from(pm)]
    }

    /// Match a month name (long names first) at the start of `text`.
    /// Returns the zero-based month and the number of chars matched.
    pub(crate) fn match_month(&self, text: &[char]) -> Option<(usize, usize)> {
        match_names(text, &MONTHS).or_else(|| match_names(text, &SHORT_MONTHS))
    }

    pub(crate) fn match_weekday(&self, text: &[char]) -> Option<(usize, usize)> {
        match_names(text, &WEEKDAYS).or_else(|| match_names(text, &SHORT_WEEKDAYS))
    }

    /// Returns `(is_pm, chars matched)`.
    pub(crate) fn match_am_pm(&self, text: &[char]) -> Option<(bool, usize)> {
        match_names(text, &AM_PM).map(|(idx, len)| (idx == 1, len))
    }
}

impl Default for DateLocale {
    fn default() -> Self {
        DateLocale::us()
    }
}

fn match_names(text: &[char], names: &[&str]) -> Option<(usize, usize)> {
    names.iter().enumerate().find_map(|(idx, name)| {
        let len = name.chars().count();
        if text.len() < len {
            return None;
        }
        let matches = text
            .iter()
            .zip(name.chars())
            .all(|(a, b)| a.eq_ignore_ascii_case(&b));
        matches.then_some((idx, len))
    })
}
