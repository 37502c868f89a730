//! Operator spacing for display
//!
//! `5+3*2` is shown as `5 + 3 * 2`. An operator is only spaced when it
//! follows a digit, `)` or `%`, which leaves unary signs and phrase text
//! alone. Dates, addresses and CIDR blocks, clock times, prefixed integer
//! literals and permission strings are copied verbatim.

use once_cell::sync::Lazy;
use regex::Regex;

static PROTECTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\d{4}-\d{1,2}-\d{1,2}",
        r"|\d{1,3}(?:\.\d{1,3}){3}(?:/\d{1,2})?",
        r"|\d{1,2}:\d{2}",
        r"|\b0[xXbBoO][0-9a-fA-F]+",
        r"|(?:[r-][w-][x-]){3}",
    ))
    .unwrap()
});

/// Normalize operator spacing in an expression.
///
/// Idempotent: normalizing twice gives the same text as normalizing once.
pub fn normalize_spacing(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len() + 8);
    let mut last = 0;
    for span in PROTECTED.find_iter(expr) {
        space_operators(&expr[last..span.start()], &mut out);
        out.push_str(span.as_str());
        last = span.end();
    }
    space_operators(&expr[last..], &mut out);
    out.truncate(out.trim_end().len());
    out
}

fn space_operators(text: &str, out: &mut String) {
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        let operator = match ch {
            '+' | '-' | '*' | '/' | '^' => Some(ch.to_string()),
            '<' | '>' | '=' | '!' if chars.peek() == Some(&'=') => {
                chars.next();
                Some(format!("{ch}="))
            }
            '<' | '>' => Some(ch.to_string()),
            _ => None,
        };
        let Some(operator) = operator else {
            out.push(ch);
            continue;
        };

        let binary = out
            .trim_end()
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_digit() || c == ')' || c == '%');
        if binary {
            out.truncate(out.trim_end().len());
            out.push(' ');
            out.push_str(&operator);
            out.push(' ');
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
        } else {
            out.push_str(&operator);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("5+3", "5 + 3")]
    #[case("5   +3*2", "5 + 3 * 2")]
    #[case("(2+3)*4", "(2 + 3) * 4")]
    #[case("3*-2", "3 * -2")]
    #[case("-5+3", "-5 + 3")]
    #[case("80+15%", "80 + 15%")]
    #[case("50%+10", "50% + 10")]
    #[case("\\1*2", "\\1 * 2")]
    #[case("$5*2", "$5 * 2")]
    #[case("2^-1", "2 ^ -1")]
    #[case("5>=3", "5 >= 3")]
    #[case("5!=3", "5 != 3")]
    #[case("5<3", "5 < 3")]
    #[case("10.0.0.0/24", "10.0.0.0/24")]
    #[case("10.0.0.0/24 split into 4 subnets", "10.0.0.0/24 split into 4 subnets")]
    #[case("hosts in /26", "hosts in /26")]
    #[case("2024-01-15", "2024-01-15")]
    #[case("2024-01-15+3 days", "2024-01-15 + 3 days")]
    #[case("10:30-09:00", "10:30 - 09:00")]
    #[case("today - 1 week", "today - 1 week")]
    #[case("rw-r--r-- to octal", "rw-r--r-- to octal")]
    #[case("0x1F", "0x1F")]
    #[case("5+", "5 +")]
    fn test_normalize_spacing(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_spacing(input), expected);
    }

    #[rstest]
    #[case("5+3*2")]
    #[case("(1+2) - -3")]
    #[case("2024-01-15+3 days")]
    fn test_idempotent(#[case] input: &str) {
        let once = normalize_spacing(input);
        assert_eq!(normalize_spacing(&once), once);
    }
}
