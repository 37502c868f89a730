//! Date and time arithmetic
//!
//! ```text
//! expression := base (('+' | '-') amount unit)* ('-' base)?
//!             | 'days between' expression 'and' expression
//!             | 'days until' expression
//! base       := today | now | tomorrow | yesterday
//!             | YYYY-MM-DD [HH:MM] | HH:MM | \N
//! ```
//!
//! A moment renders at its [`Precision`]; a difference of two moments renders
//! as a day count (with a numeric value) or, when clock times are involved,
//! as hours and minutes.

use std::fmt;

use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::context::{EvalContext, Evaluation};
use super::error::{DomainError, EvalError};
use super::evaluator::DomainEvaluator;
use crate::base::constants::REFERENCE_SIGIL;

/// Registry name of the date/time evaluator.
pub const DATETIME: &str = "datetime";

static LOOKS_LIKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:today|now|tomorrow|yesterday)\b|\d{4}-\d{1,2}-\d{1,2}|\b\d{1,2}:\d{2}\b|\bdays\s+(?:between|until)\b",
    )
    .unwrap()
});

static DAYS_BETWEEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^days\s+between\s+(?P<from>.+?)\s+and\s+(?P<to>.+)$").unwrap());

static DAYS_UNTIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^days\s+until\s+(?P<to>.+)$").unwrap());

static BASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?P<keyword>today|now|tomorrow|yesterday)\b|(?P<date>\d{4}-\d{1,2}-\d{1,2})(?:[ t](?P<clock>\d{1,2}:\d{2}))?|(?P<time>\d{1,2}:\d{2})|\\(?P<reference>\d+))",
    )
    .unwrap()
});

static OFFSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<sign>[+-])\s*(?P<amount>\d+)\s*(?P<unit>[a-z]+)\b").unwrap()
});

static MINUS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*-\s*").unwrap());

// ============================================================================
// Values
// ============================================================================

/// How much of a moment is meaningful, and therefore displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Precision {
    /// `YYYY-MM-DD`
    Date,
    /// `YYYY-MM-DD HH:MM`
    DateTime,
    /// `HH:MM`
    Time,
}

impl Precision {
    /// Precision after shifting by `unit`: clock units on a date add a time,
    /// calendar units on a time add a date.
    fn widen_for(self, unit: Unit) -> Self {
        match (self, unit.is_clock()) {
            (Self::Date, true) | (Self::Time, false) => Self::DateTime,
            (precision, _) => precision,
        }
    }
}

/// A computed moment, kept on the line so later lines can chain from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateTimeValue {
    pub at: NaiveDateTime,
    pub precision: Precision,
}

impl DateTimeValue {
    pub fn new(at: NaiveDateTime, precision: Precision) -> Self {
        Self { at, precision }
    }

    /// Midnight of `date`, shown as a date.
    pub fn date(date: NaiveDate) -> Self {
        Self::new(date.and_time(NaiveTime::MIN), Precision::Date)
    }

    /// Move by `amount` units; negative amounts move backwards.
    ///
    /// Month and year steps clamp to the end of shorter months.
    pub fn shift(self, amount: i64, unit: Unit) -> Result<Self, DomainError> {
        let out_of_range =
            || DomainError::InvalidDateTime(format!("{self} shifted by {amount} {unit}"));
        let at = match unit {
            Unit::Month | Unit::Year => {
                let months = match unit {
                    Unit::Year => amount.checked_mul(12),
                    _ => Some(amount),
                }
                .ok_or_else(out_of_range)?;
                let step = u32::try_from(months.unsigned_abs())
                    .map(Months::new)
                    .map_err(|_| out_of_range())?;
                if months < 0 {
                    self.at.checked_sub_months(step)
                } else {
                    self.at.checked_add_months(step)
                }
            }
            _ => unit
                .delta(amount)
                .and_then(|delta| self.at.checked_add_signed(delta)),
        }
        .ok_or_else(out_of_range)?;

        Ok(Self::new(at, self.precision.widen_for(unit)))
    }
}

impl fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pattern = match self.precision {
            Precision::Date => "%Y-%m-%d",
            Precision::DateTime => "%Y-%m-%d %H:%M",
            Precision::Time => "%H:%M",
        };
        write!(f, "{}", self.at.format(pattern))
    }
}

/// Offset units, with their accepted spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    pub fn parse(word: &str) -> Option<Self> {
        Some(match word {
            "s" | "sec" | "secs" | "second" | "seconds" => Self::Second,
            "min" | "mins" | "minute" | "minutes" => Self::Minute,
            "h" | "hr" | "hrs" | "hour" | "hours" => Self::Hour,
            "d" | "day" | "days" => Self::Day,
            "w" | "wk" | "wks" | "week" | "weeks" => Self::Week,
            "mo" | "mon" | "month" | "months" => Self::Month,
            "y" | "yr" | "yrs" | "year" | "years" => Self::Year,
            _ => return None,
        })
    }

    fn is_clock(self) -> bool {
        matches!(self, Self::Second | Self::Minute | Self::Hour)
    }

    /// Fixed-length units as a signed duration; `None` for calendar units.
    fn delta(self, amount: i64) -> Option<TimeDelta> {
        match self {
            Self::Second => TimeDelta::try_seconds(amount),
            Self::Minute => TimeDelta::try_minutes(amount),
            Self::Hour => TimeDelta::try_hours(amount),
            Self::Day => TimeDelta::try_days(amount),
            Self::Week => TimeDelta::try_weeks(amount),
            Self::Month | Self::Year => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Second => "seconds",
            Self::Minute => "minutes",
            Self::Hour => "hours",
            Self::Day => "days",
            Self::Week => "weeks",
            Self::Month => "months",
            Self::Year => "years",
        })
    }
}

// ============================================================================
// Evaluator
// ============================================================================

/// Cheap check run before parsing.
pub fn looks_like_date_time(expr: &str, lower: &str) -> bool {
    expr.contains(REFERENCE_SIGIL) || LOOKS_LIKE.is_match(lower)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeEvaluator;

impl DateTimeEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl DomainEvaluator for DateTimeEvaluator {
    fn name(&self) -> &'static str {
        DATETIME
    }

    fn looks_like_mine(&self, expr: &str, lower: &str) -> bool {
        looks_like_date_time(expr, lower)
    }

    fn evaluate(
        &self,
        _expr: &str,
        lower: &str,
        ctx: &EvalContext<'_>,
    ) -> Result<Option<Evaluation>, EvalError> {
        let Some(computed) = compute(lower.trim(), ctx)? else {
            return Ok(None);
        };
        trace!(line = ctx.line_number(), ?computed, "date/time result");
        Ok(Some(computed.into_evaluation()))
    }
}

/// What a date/time expression evaluated to.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Computed {
    Moment(DateTimeValue),
    Days(i64),
    Span(TimeDelta),
}

impl Computed {
    /// `later - earlier`, in days when both are plain dates.
    fn difference(later: DateTimeValue, earlier: DateTimeValue) -> Self {
        let delta = later.at.signed_duration_since(earlier.at);
        match (later.precision, earlier.precision) {
            (Precision::Date, Precision::Date) => Self::Days(delta.num_days()),
            _ => Self::Span(delta),
        }
    }

    /// Calendar days from `from` to `to`, ignoring clock times.
    fn days(from: DateTimeValue, to: DateTimeValue) -> Self {
        Self::Days(to.at.date().signed_duration_since(from.at.date()).num_days())
    }

    fn into_evaluation(self) -> Evaluation {
        match self {
            Self::Moment(value) => Evaluation::text(value.to_string()).with_date_time(value),
            Self::Days(days) => Evaluation::text(counted(days, "day")).with_value(days as f64),
            Self::Span(delta) => Evaluation::text(render_span(delta)),
        }
    }
}

fn compute(text: &str, ctx: &EvalContext<'_>) -> Result<Option<Computed>, DomainError> {
    if let Some(caps) = DAYS_BETWEEN.captures(text) {
        let (Some(from), Some(to)) = (moment(&caps["from"], ctx)?, moment(&caps["to"], ctx)?)
        else {
            return Ok(None);
        };
        return Ok(Some(Computed::days(from, to)));
    }
    if let Some(caps) = DAYS_UNTIL.captures(text) {
        let Some(to) = moment(&caps["to"], ctx)? else {
            return Ok(None);
        };
        let today = DateTimeValue::date(ctx.now().date());
        return Ok(Some(Computed::days(today, to)));
    }
    expression(text, ctx)
}

fn moment(text: &str, ctx: &EvalContext<'_>) -> Result<Option<DateTimeValue>, DomainError> {
    Ok(match expression(text.trim(), ctx)? {
        Some(Computed::Moment(value)) => Some(value),
        _ => None,
    })
}

/// A base followed by offsets and an optional subtracted base.
///
/// Anything left unconsumed means the text is not a date/time expression.
fn expression(text: &str, ctx: &EvalContext<'_>) -> Result<Option<Computed>, DomainError> {
    let Some((mut value, mut rest)) = base(text, ctx)? else {
        return Ok(None);
    };
    loop {
        if rest.trim().is_empty() {
            return Ok(Some(Computed::Moment(value)));
        }
        if let Some(caps) = OFFSET.captures(rest) {
            let Some(unit) = Unit::parse(&caps["unit"]) else {
                return Ok(None);
            };
            let amount: i64 = caps["amount"]
                .parse()
                .map_err(|_| DomainError::InvalidDateTime(caps[0].trim().to_string()))?;
            let amount = if &caps["sign"] == "-" { -amount } else { amount };
            value = value.shift(amount, unit)?;
            rest = &rest[caps[0].len()..];
            continue;
        }
        if let Some(minus) = MINUS.find(rest) {
            return Ok(match base(&rest[minus.end()..], ctx)? {
                Some((earlier, tail)) if tail.trim().is_empty() => {
                    Some(Computed::difference(value, earlier))
                }
                _ => None,
            });
        }
        return Ok(None);
    }
}

/// Parse the base moment at the start of `text`, returning it and the rest.
fn base<'t>(
    text: &'t str,
    ctx: &EvalContext<'_>,
) -> Result<Option<(DateTimeValue, &'t str)>, DomainError> {
    let Some(caps) = BASE.captures(text) else {
        return Ok(None);
    };
    let rest = &text[caps[0].len()..];
    let now = ctx.now();

    let value = if let Some(keyword) = caps.name("keyword") {
        let today = DateTimeValue::date(now.date());
        match keyword.as_str() {
            "now" => DateTimeValue::new(now, Precision::DateTime),
            "tomorrow" => today.shift(1, Unit::Day)?,
            "yesterday" => today.shift(-1, Unit::Day)?,
            _ => today,
        }
    } else if let Some(date) = caps.name("date") {
        let date = parse_date(date.as_str())?;
        match caps.name("clock") {
            Some(clock) => {
                DateTimeValue::new(date.and_time(parse_time(clock.as_str())?), Precision::DateTime)
            }
            None => DateTimeValue::date(date),
        }
    } else if let Some(time) = caps.name("time") {
        DateTimeValue::new(now.date().and_time(parse_time(time.as_str())?), Precision::Time)
    } else {
        let referenced = caps
            .name("reference")
            .and_then(|n| n.as_str().parse().ok())
            .and_then(|n| ctx.date_time(n));
        match referenced {
            Some(value) => value,
            None => return Ok(None),
        }
    };
    Ok(Some((value, rest)))
}

fn parse_date(text: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| DomainError::InvalidDateTime(text.to_string()))
}

fn parse_time(text: &str) -> Result<NaiveTime, DomainError> {
    let invalid = || DomainError::InvalidDateTime(text.to_string());
    let (hours, minutes) = text.split_once(':').ok_or_else(invalid)?;
    let hours = hours.parse().map_err(|_| invalid())?;
    let minutes = minutes.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

// ============================================================================
// Rendering
// ============================================================================

fn counted(count: i64, unit: &str) -> String {
    if count.abs() == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

fn render_span(delta: TimeDelta) -> String {
    let minutes = delta.num_minutes();
    let sign = if minutes < 0 { "-" } else { "" };
    let (hours, minutes) = (minutes.abs() / 60, minutes.abs() % 60);
    match (hours, minutes) {
        (0, minutes) => format!("{sign}{}", counted(minutes, "minute")),
        (hours, 0) => format!("{sign}{}", counted(hours, "hour")),
        (hours, minutes) => format!(
            "{sign}{} {}",
            counted(hours, "hour"),
            counted(minutes, "minute")
        ),
    }
}

#[cfg(test)]
mod tests;
