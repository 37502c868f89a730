//! Result formatting
//!
//! Turns computed values into the text written after a line's `=`.
//! Formatting never fails: non-finite numbers degrade to `"NaN"`.

use crate::parser::Outcome;

/// Text shown for NaN and infinities.
pub const NOT_A_NUMBER: &str = "NaN";

/// Most fraction digits kept for plain numbers before trailing zeros are trimmed.
const PLAIN_FRACTION_DIGITS: i32 = 10;

/// Significant digits an `f64` carries reliably.
const SIGNIFICANT_DIGITS: i32 = 15;

/// Format the outcome of an arithmetic expression.
///
/// Comparison results render as `true` / `false` regardless of currency.
pub fn format_outcome(outcome: &Outcome, is_currency: bool) -> String {
    match outcome {
        Outcome::Boolean(b) => b.to_string(),
        Outcome::Number(value) => format_number(value.number, is_currency),
    }
}

/// Format a number as plain decimal or currency.
pub fn format_number(value: f64, is_currency: bool) -> String {
    if !value.is_finite() {
        return NOT_A_NUMBER.to_string();
    }
    if is_currency {
        format_currency(value)
    } else {
        format_plain(value)
    }
}

/// `$1,234.50` style; negatives keep their sign in front of the `$`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return NOT_A_NUMBER.to_string();
    }

    let magnitude = value.abs();
    let mut whole = magnitude.trunc();
    let mut cents = ((magnitude - whole) * 100.0).round();
    if cents >= 100.0 {
        whole += 1.0;
        cents = 0.0;
    }

    let sign = if value < 0.0 && (whole > 0.0 || cents > 0.0) {
        "-"
    } else {
        ""
    };
    format!(
        "{sign}${}.{:02}",
        group_thousands(&format!("{whole:.0}")),
        cents as u8
    )
}

/// Minimal decimal form with a grouped integer part.
pub fn format_plain(value: f64) -> String {
    if !value.is_finite() {
        return NOT_A_NUMBER.to_string();
    }

    let fixed = format!("{:.*}", fraction_digits(value.abs()), value.abs());
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    let (integer, fraction) = match trimmed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (trimmed, None),
    };

    let is_zero = integer == "0" && fraction.is_none();
    let mut out = String::with_capacity(trimmed.len() + 4);
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(integer));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Fraction digits that stay within the significant digits of `magnitude`.
fn fraction_digits(magnitude: f64) -> usize {
    if magnitude == 0.0 {
        return 0;
    }
    let exponent = magnitude.log10().floor() as i32;
    (SIGNIFICANT_DIGITS - 1 - exponent).clamp(0, PLAIN_FRACTION_DIGITS) as usize
}

/// Insert `,` every three digits of an unsigned digit string.
pub fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
