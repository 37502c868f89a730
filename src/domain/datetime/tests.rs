//! Tests for date/time arithmetic

use chrono::NaiveDate;
use rstest::rstest;

use super::*;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap()
}

fn eval(expr: &str) -> Option<Evaluation> {
    let ctx = EvalContext::new(1, &[], now());
    DateTimeEvaluator::new()
        .evaluate(expr, &expr.to_lowercase(), &ctx)
        .unwrap_or_else(|e| panic!("{expr:?} failed: {e}"))
}

fn text(expr: &str) -> String {
    match eval(expr) {
        Some(evaluation) => evaluation.text,
        None => panic!("{expr:?} was declined"),
    }
}

#[rstest]
#[case("today", "2024-01-15")]
#[case("Today", "2024-01-15")]
#[case("now", "2024-01-15 10:30")]
#[case("tomorrow", "2024-01-16")]
#[case("yesterday", "2024-01-14")]
#[case("today + 3 days", "2024-01-18")]
#[case("today - 1 week", "2024-01-08")]
#[case("today + 2 hours", "2024-01-15 02:00")]
#[case("now + 90 min", "2024-01-15 12:00")]
#[case("2024-01-31 + 1 month", "2024-02-29")]
#[case("2023-02-28 + 1 year", "2024-02-28")]
#[case("2024-03-10 + 1 month - 2 days", "2024-04-08")]
#[case("2024-01-15 09:00 + 30 minutes", "2024-01-15 09:30")]
#[case("18:00 + 45 min", "18:45")]
#[case("23:30 + 1 h", "00:30")]
#[case("09:00 + 1 day", "2024-01-16 09:00")]
fn test_moments(#[case] expr: &str, #[case] expected: &str) {
    assert_eq!(text(expr), expected);
}

#[rstest]
#[case("2024-03-01 - 2024-01-01", "60 days")]
#[case("2024-01-01 - 2024-01-02", "-1 day")]
#[case("days between 2024-01-01 and 2024-12-25", "359 days")]
#[case("days until 2024-01-16", "1 day")]
#[case("days until 2024-02-14", "30 days")]
#[case("17:45 - 09:00", "8 hours 45 minutes")]
#[case("10:15 - 10:00", "15 minutes")]
#[case("now - 08:30", "2 hours")]
fn test_differences(#[case] expr: &str, #[case] expected: &str) {
    assert_eq!(text(expr), expected);
}

#[test]
fn test_day_count_exposes_value() {
    let evaluation = eval("days until 2024-01-25").unwrap();
    assert_eq!(evaluation.value, Some(10.0));
    assert_eq!(evaluation.date_time, None);
}

#[test]
fn test_moment_exposes_date_time() {
    let evaluation = eval("tomorrow").unwrap();
    assert_eq!(evaluation.value, None);
    assert_eq!(
        evaluation.date_time,
        Some(DateTimeValue::date(NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()))
    );
}

#[rstest]
#[case("today + 3")]
#[case("today + 3 fortnights")]
#[case("today * 2")]
#[case("12 + 4")]
#[case("\\1 + 5")]
fn test_declined(#[case] expr: &str) {
    assert_eq!(eval(expr), None);
}

#[rstest]
#[case("2024-02-30")]
#[case("25:00")]
#[case("2024-01-15 24:10")]
fn test_invalid_literals_fail(#[case] expr: &str) {
    let ctx = EvalContext::new(1, &[], now());
    let result = DateTimeEvaluator::new().evaluate(expr, expr, &ctx);
    assert!(matches!(
        result,
        Err(EvalError::Domain(DomainError::InvalidDateTime(_)))
    ));
}

#[rstest]
#[case("today", true)]
#[case("2024-01-15", true)]
#[case("6:00 + 2 hours", true)]
#[case("days until 2024-12-25", true)]
#[case("\\1 + 3 days", true)]
#[case("snowfall * 2", false)]
#[case("50% of 80", false)]
#[case("10.0.0.0/24", false)]
fn test_pre_filter(#[case] expr: &str, #[case] expected: bool) {
    assert_eq!(looks_like_date_time(expr, &expr.to_lowercase()), expected);
}

#[test]
fn test_precision_widens_with_units() {
    let date = DateTimeValue::date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(date.shift(1, Unit::Day).unwrap().precision, Precision::Date);
    assert_eq!(
        date.shift(1, Unit::Hour).unwrap().precision,
        Precision::DateTime
    );
}

#[test]
fn test_shift_out_of_range_fails() {
    let date = DateTimeValue::date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert!(date.shift(i64::MAX, Unit::Year).is_err());
    assert!(date.shift(i64::MAX, Unit::Day).is_err());
}
