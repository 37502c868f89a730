//! Unix permission bits
//!
//! `chmod 755` / `755 permissions` → `rwxr-xr-x`, and back:
//! `chmod rwxr-xr-x` / `rwxr-xr-x to octal` → `755`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::evaluator::ChainEvaluator;
use super::handler::{HandlerChain, HandlerOutcome, HandlerResult};

/// Registry name of the permissions evaluator.
pub const PERMISSIONS: &str = "permissions";

const SYMBOLIC: &str = r"(?P<symbolic>(?:[r-][w-][x-]){3})";

static TO_SYMBOLIC: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"^chmod\s+(?P<octal>[0-7]{3})$").unwrap(),
        Regex::new(r"^(?P<octal>[0-7]{3})\s+(?:permissions?|perms|to\s+symbolic)$").unwrap(),
    ]
});

static TO_OCTAL: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(&format!(r"^chmod\s+{SYMBOLIC}$")).unwrap(),
        Regex::new(&format!(r"^{SYMBOLIC}\s+(?:to|in|as)\s+(?:octal|numeric)$")).unwrap(),
    ]
});

static SYMBOLIC_LIKE: Lazy<Regex> = Lazy::new(|| Regex::new(SYMBOLIC).unwrap());

/// Cheap check run before any handler.
pub fn looks_like_permissions(_expr: &str, lower: &str) -> bool {
    lower.contains("chmod") || lower.contains("perm") || SYMBOLIC_LIKE.is_match(lower)
}

pub fn permissions_chain() -> HandlerChain {
    HandlerChain::new()
        .with_fn("to_symbolic", to_symbolic)
        .with_fn("to_octal", to_octal)
}

/// The permissions domain evaluator.
pub fn permissions_evaluator() -> ChainEvaluator {
    ChainEvaluator::new(PERMISSIONS, looks_like_permissions, permissions_chain())
}

/// `7` → `rwx`, one octal digit per class.
fn symbolic_triad(digit: u32) -> String {
    [(4, 'r'), (2, 'w'), (1, 'x')]
        .iter()
        .map(|&(bit, ch)| if digit & bit != 0 { ch } else { '-' })
        .collect()
}

fn to_symbolic(_expr: &str, lower: &str) -> HandlerResult {
    let Some(caps) = TO_SYMBOLIC.iter().find_map(|p| p.captures(lower.trim())) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let text = caps["octal"]
        .chars()
        .filter_map(|c| c.to_digit(8))
        .map(symbolic_triad)
        .collect::<String>();
    Ok(HandlerOutcome::Claimed(text))
}

fn to_octal(_expr: &str, lower: &str) -> HandlerResult {
    let Some(caps) = TO_OCTAL.iter().find_map(|p| p.captures(lower.trim())) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let bits = caps["symbolic"].as_bytes();
    let text = bits
        .chunks(3)
        .map(|triad| {
            triad
                .iter()
                .zip([4, 2, 1])
                .filter(|(b, _)| **b != b'-')
                .map(|(_, weight)| weight)
                .sum::<u32>()
                .to_string()
        })
        .collect::<String>();
    Ok(HandlerOutcome::Claimed(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn run(expr: &str) -> HandlerResult {
        permissions_chain().run(expr, &expr.to_lowercase())
    }

    #[rstest]
    #[case("chmod 755", "rwxr-xr-x")]
    #[case("644 permissions", "rw-r--r--")]
    #[case("600 perms", "rw-------")]
    #[case("chmod rwxr-xr-x", "755")]
    #[case("rw-r----- to octal", "640")]
    #[case("--------- as numeric", "000")]
    fn test_conversions(#[case] expr: &str, #[case] expected: &str) {
        assert_eq!(run(expr), Ok(HandlerOutcome::claimed(expected)));
    }

    #[rstest]
    #[case("755")]
    #[case("chmod 855")]
    #[case("chmod rwxrwx")]
    fn test_not_claimed(#[case] expr: &str) {
        assert_eq!(run(expr), Ok(HandlerOutcome::NotMine));
    }
}
