//! Tests for normalization and tokenization

use super::super::*;

fn kinds(expr: &str) -> Vec<TokenKind> {
    tokenize(expr)
        .unwrap_or_else(|e| panic!("failed to tokenize {expr:?}: {e}"))
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn test_normalize_unicode_operators() {
    assert_eq!(normalize("5 − 3"), "5 - 3");
    assert_eq!(normalize("5 – 3"), "5 - 3");
    assert_eq!(normalize("5 × 3"), "5 * 3");
    assert_eq!(normalize("6 ÷ 3"), "6 / 3");
    assert_eq!(normalize("1\t+\u{a0}2"), "1 + 2");
}

#[test]
fn test_normalize_x_in_multiplication_context() {
    assert_eq!(normalize("2 x 3"), "2 * 3");
    assert_eq!(normalize("2x3"), "2*3");
    assert_eq!(normalize("(1 + 2) X 4"), "(1 + 2) * 4");
    assert_eq!(normalize("50% x $10"), "50% * $10");
    assert_eq!(normalize("3 x \\1"), "3 * \\1");
    assert_eq!(normalize("2 x pi"), "2 * pi");
}

#[test]
fn test_normalize_leaves_identifiers_alone() {
    assert_eq!(normalize("max"), "max");
    assert_eq!(normalize("exp(1)"), "exp(1)");
    assert_eq!(normalize("x + 1"), "x + 1");
    assert_eq!(normalize("2 x"), "2 x");
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_number_with_grouping() {
    assert_eq!(kinds("1,234,567.5"), vec![TokenKind::Number(1_234_567.5)]);
    assert_eq!(kinds(".25"), vec![TokenKind::Number(0.25)]);
}

#[test]
fn test_percent_literal() {
    assert_eq!(kinds("20%"), vec![TokenKind::Percent(20.0)]);
    assert_eq!(kinds("12.5%"), vec![TokenKind::Percent(12.5)]);
}

#[test]
fn test_currency_literal() {
    assert_eq!(kinds("$1,000.50"), vec![TokenKind::Currency(1000.5)]);
}

#[test]
fn test_reference_and_identifier() {
    assert_eq!(
        kinds("\\12 * SQRT(4)"),
        vec![
            TokenKind::Reference(12),
            TokenKind::Star,
            TokenKind::Ident("sqrt".into()),
            TokenKind::LParen,
            TokenKind::Number(4.0),
            TokenKind::RParen,
        ]
    );
}

#[test]
fn test_comparisons_and_swallowed_separator() {
    assert_eq!(
        kinds("1 >= 2 ="),
        vec![TokenKind::Number(1.0), TokenKind::GtEq, TokenKind::Number(2.0)]
    );
    assert_eq!(
        kinds("1 == 1"),
        vec![TokenKind::Number(1.0), TokenKind::EqEq, TokenKind::Number(1.0)]
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_bare_reference_sigil_is_error() {
    assert!(matches!(
        tokenize("\\ + 1"),
        Err(LexError::DanglingReference { .. })
    ));
}

#[test]
fn test_bare_currency_sigil_is_error() {
    assert!(matches!(tokenize("$"), Err(LexError::DanglingCurrency { .. })));
    assert!(matches!(tokenize("$abc"), Err(LexError::DanglingCurrency { .. })));
}

#[test]
fn test_currency_with_percent_is_error() {
    assert!(matches!(tokenize("$5%"), Err(LexError::DanglingCurrency { .. })));
}

#[test]
fn test_unknown_character_reports_offset() {
    let err = tokenize("1 + @").unwrap_err();
    assert_eq!(
        err,
        LexError::UnexpectedCharacter {
            ch: '@',
            offset: TextSize::new(4)
        }
    );
    assert_eq!(err.offset(), TextSize::new(4));
}
