//! Percentage phrasings
//!
//! `15% of 80`, `what is 15% of $80`, `20% off $50`, `20 is what % of 80`,
//! `20 as % of 80`, `20 is 25% of what`. Operands are arithmetic
//! expressions; `\N` references are expanded before the handlers run.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::error::DomainError;
use super::evaluator::ChainEvaluator;
use super::handler::{HandlerChain, HandlerOutcome, HandlerResult};
use crate::base::constants::CURRENCY_SIGIL;
use crate::format::format_number;
use crate::parser::{Outcome, evaluate};

/// Registry name of the percentage evaluator.
pub const PERCENTAGE: &str = "percentage";

static WHAT_PERCENT: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"^(?P<part>.+?)\s+is\s+what\s*%\s+of\s+(?P<whole>.+?)\s*\??$").unwrap(),
        Regex::new(r"^(?P<part>.+?)\s+as\s+(?:a\s+)?%\s+of\s+(?P<whole>.+?)$").unwrap(),
    ]
});

static OF_WHAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<part>.+?)\s+is\s+(?P<rate>[^%]+?)\s*%\s+of\s+what\s*\??$").unwrap()
});

static OFF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<rate>[^%]+?)\s*%\s+off\s+(?P<base>.+?)$").unwrap());

static OF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:what\s+is\s+)?(?P<rate>[^%]+?)\s*%\s+of\s+(?P<base>.+?)\s*\??$").unwrap()
});

/// Cheap check run before any handler.
pub fn looks_like_percentage(_expr: &str, lower: &str) -> bool {
    lower.contains('%') && (lower.contains(" of ") || lower.contains(" off "))
}

pub fn percentage_chain() -> HandlerChain {
    HandlerChain::new()
        .with_fn("what_percent", what_percent)
        .with_fn("of_what", of_what)
        .with_fn("percent_off", percent_off)
        .with_fn("percent_of", percent_of)
}

/// The percentage domain evaluator.
pub fn percentage_evaluator() -> ChainEvaluator {
    ChainEvaluator::new(PERCENTAGE, looks_like_percentage, percentage_chain())
        .expanding_references()
        .with_numeric_results()
}

fn operand(caps: &Captures<'_>, name: &str) -> Result<f64, DomainError> {
    let text = &caps[name];
    match evaluate(text, None) {
        Ok(Outcome::Number(value)) => Ok(value.number),
        Ok(Outcome::Boolean(_)) => Err(DomainError::malformed(
            PERCENTAGE,
            format!("`{text}` is a comparison"),
        )),
        Err(err) => Err(DomainError::malformed(PERCENTAGE, err.to_string())),
    }
}

fn amount(value: f64, expr: &str) -> String {
    format_number(value, expr.contains(CURRENCY_SIGIL))
}

fn what_percent(_expr: &str, lower: &str) -> HandlerResult {
    let Some(caps) = WHAT_PERCENT.iter().find_map(|p| p.captures(lower)) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let ratio = operand(&caps, "part")? / operand(&caps, "whole")?;
    Ok(HandlerOutcome::claimed(format!(
        "{}%",
        format_number(ratio * 100.0, false)
    )))
}

fn of_what(expr: &str, lower: &str) -> HandlerResult {
    let Some(caps) = OF_WHAT.captures(lower) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let whole = operand(&caps, "part")? / (operand(&caps, "rate")? / 100.0);
    Ok(HandlerOutcome::claimed(amount(whole, expr)))
}

fn percent_off(expr: &str, lower: &str) -> HandlerResult {
    let Some(caps) = OFF.captures(lower) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let discounted = operand(&caps, "base")? * (1.0 - operand(&caps, "rate")? / 100.0);
    Ok(HandlerOutcome::claimed(amount(discounted, expr)))
}

fn percent_of(expr: &str, lower: &str) -> HandlerResult {
    let Some(caps) = OF.captures(lower) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let part = operand(&caps, "base")? * operand(&caps, "rate")? / 100.0;
    Ok(HandlerOutcome::claimed(amount(part, expr)))
}
