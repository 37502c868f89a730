//! Number base conversion
//!
//! `255 in hex` → `0xFF`, `0b1010 to decimal` → `10`, bare `0x1F` → `31`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::DomainError;
use super::evaluator::ChainEvaluator;
use super::handler::{HandlerChain, HandlerOutcome, HandlerResult};

/// Registry name of the programmer evaluator.
pub const PROGRAMMER: &str = "programmer";

const LITERAL: &str = r"(?P<literal>-?(?:0x[0-9a-f]+|0b[01]+|0o[0-7]+|\d+))";

static CONVERT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^{LITERAL}\s+(?:in|to|as)\s+(?P<radix>hex|hexadecimal|binary|bin|octal|oct|decimal|dec)$"
    ))
    .unwrap()
});

static BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<literal>-?(?:0x[0-9a-f]+|0b[01]+|0o[0-7]+))$").unwrap());

static KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:0x|0b|0o)|\b(?:hex|hexadecimal|binary|bin|octal|oct|decimal|dec)$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Radix {
    Binary,
    Octal,
    Decimal,
    Hex,
}

impl Radix {
    fn parse(word: &str) -> Option<Self> {
        Some(match word {
            "hex" | "hexadecimal" => Self::Hex,
            "binary" | "bin" => Self::Binary,
            "octal" | "oct" => Self::Octal,
            "decimal" | "dec" => Self::Decimal,
            _ => return None,
        })
    }

    fn render(self, value: i64) -> String {
        let sign = if value < 0 { "-" } else { "" };
        let magnitude = value.unsigned_abs();
        match self {
            Self::Hex => format!("{sign}0x{magnitude:X}"),
            Self::Binary => format!("{sign}0b{magnitude:b}"),
            Self::Octal => format!("{sign}0o{magnitude:o}"),
            Self::Decimal => value.to_string(),
        }
    }
}

/// Cheap check run before any handler.
pub fn looks_like_programmer(_expr: &str, lower: &str) -> bool {
    KEYWORD.is_match(lower.trim())
}

pub fn programmer_chain() -> HandlerChain {
    HandlerChain::new()
        .with_fn("convert", convert)
        .with_fn("bare_literal", bare_literal)
}

/// The programmer domain evaluator.
pub fn programmer_evaluator() -> ChainEvaluator {
    ChainEvaluator::new(PROGRAMMER, looks_like_programmer, programmer_chain())
        .with_numeric_results()
}

/// Parse a prefixed or decimal integer literal.
fn parse_literal(text: &str) -> Result<i64, DomainError> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (radix, digits) = match digits.get(..2) {
        Some("0x") => (16, &digits[2..]),
        Some("0b") => (2, &digits[2..]),
        Some("0o") => (8, &digits[2..]),
        _ => (10, digits),
    };
    let magnitude = i64::from_str_radix(digits, radix)
        .map_err(|_| DomainError::overflow(format!("`{text}` does not fit in 64 bits")))?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn convert(_expr: &str, lower: &str) -> HandlerResult {
    let Some(caps) = CONVERT.captures(lower.trim()) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let Some(radix) = Radix::parse(&caps["radix"]) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let value = parse_literal(&caps["literal"])?;
    Ok(HandlerOutcome::claimed(radix.render(value)))
}

fn bare_literal(_expr: &str, lower: &str) -> HandlerResult {
    let Some(caps) = BARE.captures(lower.trim()) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let value = parse_literal(&caps["literal"])?;
    Ok(HandlerOutcome::claimed(Radix::Decimal.render(value)))
}
