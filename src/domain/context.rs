//! Per-line evaluation context and evaluator results

use chrono::NaiveDateTime;

use super::datetime::DateTimeValue;
use crate::base::constants::CURRENCY_SIGIL;
use crate::document::EvaluatedLine;
use crate::parser::{Outcome, ParseError, ReferenceResolver, evaluate};

/// Everything an evaluator may read while evaluating one line.
///
/// `prior` holds exactly the lines before the current one, so a reference
/// can never observe the line being evaluated or anything after it.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    line_number: usize,
    prior: &'a [EvaluatedLine],
    now: NaiveDateTime,
    is_currency: bool,
}

impl<'a> EvalContext<'a> {
    /// Context for 1-based `line_number`; `prior` must be the lines before it.
    pub fn new(line_number: usize, prior: &'a [EvaluatedLine], now: NaiveDateTime) -> Self {
        debug_assert_eq!(prior.len() + 1, line_number);
        Self {
            line_number,
            prior,
            now,
            is_currency: false,
        }
    }

    /// Mark the line as a currency line.
    pub fn with_currency(mut self, is_currency: bool) -> Self {
        self.is_currency = is_currency;
        self
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The instant `now` / `today` refer to during this pass.
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Whether this line's own text or a referenced line involves currency.
    pub fn is_currency(&self) -> bool {
        self.is_currency
    }

    // ========================================================================
    // Reference resolution
    // ========================================================================

    /// Look up an earlier line that produced a result.
    pub fn line(&self, number: usize) -> Result<&'a EvaluatedLine, ParseError> {
        if number == self.line_number {
            return Err(ParseError::SelfReference(number));
        }
        if number > self.line_number {
            return Err(ParseError::ForwardReference(number));
        }
        match number.checked_sub(1).and_then(|i| self.prior.get(i)) {
            Some(line) if line.has_result => Ok(line),
            _ => Err(ParseError::UnresolvedReference(number)),
        }
    }

    /// Numeric value of an earlier line.
    pub fn number(&self, number: usize) -> Result<f64, ParseError> {
        self.line(number)?
            .value
            .ok_or(ParseError::NonNumericReference(number))
    }

    /// Date/time value of an earlier line, if it has one.
    pub fn date_time(&self, number: usize) -> Option<DateTimeValue> {
        self.line(number).ok().and_then(|line| line.date_time)
    }

    /// Evaluate an arithmetic sub-expression with this context's references.
    pub fn evaluate_arithmetic(&self, expr: &str) -> Result<Outcome, ParseError> {
        evaluate(expr, Some(self))
    }

    /// Replace every `\N` with the referenced number.
    ///
    /// Currency lines are written back as `$` amounts so phrase handlers can
    /// still see that money is involved.
    pub fn expand_references(&self, expr: &str) -> Result<String, ParseError> {
        let mut failure = None;
        let expanded = crate::base::rewrite_references_with(expr, |target| {
            match self.line(target).and_then(|line| {
                line.value
                    .map(|value| (value, line.is_currency))
                    .ok_or(ParseError::NonNumericReference(target))
            }) {
                Ok((value, true)) if value < 0.0 => format!("-{CURRENCY_SIGIL}{}", -value),
                Ok((value, true)) => format!("{CURRENCY_SIGIL}{value}"),
                Ok((value, false)) => value.to_string(),
                Err(err) => {
                    failure.get_or_insert(err);
                    String::new()
                }
            }
        });
        match failure {
            Some(err) => Err(err),
            None => Ok(expanded.into_owned()),
        }
    }
}

impl ReferenceResolver for EvalContext<'_> {
    fn resolve(&self, line: usize) -> Result<f64, ParseError> {
        self.number(line)
    }
}

/// What a domain evaluator computed for one line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Evaluation {
    /// Result text; lines after the first become continuation lines.
    pub text: String,
    /// Numeric value later lines can reference.
    pub value: Option<f64>,
    /// Date/time value later date arithmetic can chain from.
    pub date_time: Option<DateTimeValue>,
}

impl Evaluation {
    /// A text-only result.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Attach a numeric value.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Attach a date/time value.
    pub fn with_date_time(mut self, date_time: DateTimeValue) -> Self {
        self.date_time = Some(date_time);
        self
    }
}
