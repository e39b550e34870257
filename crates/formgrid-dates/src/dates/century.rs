//! Century pivot for two-digit years.

use chrono::{Datelike, Local};
use std::sync::OnceLock;

/// Cutoffs used to expand a two-digit year into a full year.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CenturyPivot {
    pub current_year: i32,
    pub current_century: i32,
    pub past_century: i32,
}

impl CenturyPivot {
    pub fn for_year(year: i32) -> CenturyPivot {
        let current_century = year - year.rem_euclid(100);
        CenturyPivot {
            current_year: year,
            current_century,
            past_century: current_century - 100,
        }
    }

    /// Process-wide pivot, sampled from the system clock on first use.
    ///
    /// The value is never refreshed, so a process that lives across a
    /// century boundary keeps the old cutoffs.
    pub fn process() -> CenturyPivot {
        static PIVOT: OnceLock<CenturyPivot> = OnceLock::new();
        *PIVOT.get_or_init(|| {
            let pivot = CenturyPivot::for_year(Local::now().year());
            tracing::debug!(
                current_year = pivot.current_year,
                current_century = pivot.current_century,
                "century pivot initialised"
            );
            pivot
        })
    }

    /// Expand a two-digit year. Years outside `0..=99` pass through.
    pub fn expand(&self, year: i32) -> i32 {
        match year {
            0..=49 => self.current_century + year,
            50..=99 => self.past_century + year,
            _ => year,
        }
    }
}

impl Default for CenturyPivot {
    fn default() -> Self {
        CenturyPivot::process()
    }
}
