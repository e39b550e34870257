//! Integration tests for the date shortcut interpreter.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use formgrid::{CenturyPivot, DatePattern, RawInput, ReferenceContext, interpret};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

fn context(pattern: &str, reference: NaiveDateTime) -> ReferenceContext {
    ReferenceContext::new(DatePattern::new(pattern).unwrap())
        .with_reference(reference)
        .with_pivot(CenturyPivot::for_year(2026))
}

fn midday() -> NaiveDateTime {
    at(2026, 10, 14, 12, 0, 0)
}

#[test]
fn test_two_digit_years_split_at_fifty() {
    let pivot = CenturyPivot::for_year(2026);
    for y in 0..50 {
        assert_eq!(pivot.expand(y), 2000 + y);
    }
    for y in 50..100 {
        assert_eq!(pivot.expand(y), 1900 + y);
    }

    let ctx = context("MM/dd/yy", midday());
    assert_eq!(
        interpret(RawInput::new("03/01/49"), &ctx),
        Ok(Some(at(2049, 3, 1, 0, 0, 0)))
    );
    assert_eq!(
        interpret(RawInput::new("03/01/50"), &ctx),
        Ok(Some(at(1950, 3, 1, 0, 0, 0)))
    );
}

#[test]
fn test_day_offsets_versus_hour_offsets() {
    let ctx = context("MM/dd/yy HH:mm", midday());
    let plus_three = interpret(RawInput::new("+3d"), &ctx).unwrap().unwrap();
    assert_eq!(plus_three, at(2026, 10, 17, 12, 0, 0));

    let minus_day = interpret(RawInput::new("-1d"), &ctx).unwrap().unwrap();
    assert_eq!(minus_day, at(2026, 10, 13, 0, 0, 0));

    let minus_hours = interpret(RawInput::new("-24h"), &ctx).unwrap().unwrap();
    assert_eq!(minus_hours, at(2026, 10, 13, 12, 0, 0));
    assert_ne!(minus_day, minus_hours);
}

#[test]
fn test_bare_number_targets_the_finest_pattern_field() {
    let reference = at(2026, 10, 14, 12, 42, 9);

    let dated = interpret(RawInput::new("17"), &context("MM/dd/yy", reference))
        .unwrap()
        .unwrap();
    assert_eq!(dated, at(2026, 10, 17, 0, 0, 0));

    let timed = interpret(RawInput::new("17"), &context("MM/dd/yy HH:mm", reference))
        .unwrap()
        .unwrap();
    assert_eq!(timed.date(), reference.date());
    assert_eq!(timed.hour(), 12);
    assert_eq!(timed.minute(), 17);
    assert_eq!(timed.second(), 0);
}

#[test]
fn test_formatted_output_reads_back_unchanged() {
    let samples = [
        ("MM/dd/yy", "17"),
        ("MM/dd/yy HH:mm", "+90m"),
        ("dd.MM.yyyy HH:mm:ss", "-2w"),
        ("yyyy-MM-dd", "6y"),
    ];
    for (pattern, shortcut) in samples {
        let ctx = context(pattern, at(2026, 10, 14, 12, 30, 0));
        let first = match interpret(RawInput::new(shortcut), &ctx) {
            Ok(Some(value)) => value,
            other => panic!("{shortcut:?} against {pattern:?} gave {other:?}"),
        };
        let text = ctx.pattern().format(&first);
        assert_eq!(
            interpret(RawInput::new(&text), &ctx),
            Ok(Some(first)),
            "{text:?} against {pattern:?}"
        );
    }
}

#[test]
fn test_failure_offset_points_into_typed_text() {
    let ctx = context("MM/dd/yy", midday());
    let failure = interpret(RawInput::new("12/3x/26"), &ctx).unwrap_err();
    assert_eq!(failure.error_offset, 4);
}
