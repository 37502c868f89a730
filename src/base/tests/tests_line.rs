//! Tests for single-line classification and host utilities

use super::super::*;

// ============================================================================
// classify
// ============================================================================

#[test]
fn test_classify_blank_and_comment() {
    assert_eq!(classify(""), LineKind::Blank);
    assert_eq!(classify("   \t"), LineKind::Blank);
    assert_eq!(classify("# groceries"), LineKind::Comment);
    assert_eq!(classify("  # indented = still a comment"), LineKind::Comment);
}

#[test]
fn test_classify_continuation() {
    assert_eq!(classify("> Hosts: 254"), LineKind::Continuation);
    assert_eq!(classify("   > Mask: 255.255.255.0"), LineKind::Continuation);
    // No space after `>` means it is not a continuation line
    assert_eq!(classify(">Hosts"), LineKind::Pending);
}

#[test]
fn test_classify_pending_and_expression() {
    assert_eq!(classify("2 + 3"), LineKind::Pending);
    assert_eq!(classify("= 5"), LineKind::Pending);
    assert_eq!(classify("2 + 3 ="), LineKind::Expression);
    assert_eq!(classify("2 + 3 = 5"), LineKind::Expression);
}

#[test]
fn test_passthrough_kinds() {
    assert!(LineKind::Blank.is_passthrough());
    assert!(LineKind::Pending.is_passthrough());
    assert!(!LineKind::Expression.is_passthrough());
}

// ============================================================================
// split_assignment
// ============================================================================

#[test]
fn test_split_skips_comparison_operators() {
    let a = split_assignment("5 == 5 = true").unwrap();
    assert_eq!(a.expression, "5 == 5");
    assert_eq!(a.result, "true");

    let a = split_assignment("3 >= 2 =").unwrap();
    assert_eq!(a.expression, "3 >= 2");
    assert_eq!(a.result, "");

    assert!(split_assignment("1 != 2").is_none());
    assert!(split_assignment("1 <= 2").is_none());
}

#[test]
fn test_split_extracts_inline_comment() {
    let a = split_assignment("$40 * 3 = $120.00 # lunch").unwrap();
    assert_eq!(a.expression, "$40 * 3");
    assert_eq!(a.result, "$120.00");
    assert_eq!(a.comment, Some("# lunch"));
}

#[test]
fn test_split_first_separator_wins() {
    let a = split_assignment("2 + 3 = 5 = 6").unwrap();
    assert_eq!(a.expression, "2 + 3");
    assert_eq!(a.result, "5 = 6");
}

// ============================================================================
// strip_result / has_result
// ============================================================================

#[test]
fn test_strip_result() {
    assert_eq!(strip_result("2 + 3 = 5"), "2 + 3 =");
    assert_eq!(strip_result("2 + 3 = 5 # sum"), "2 + 3 = # sum");
    assert_eq!(strip_result("no separator"), "no separator");
}

#[test]
fn test_has_result() {
    assert!(has_result("2 + 3 = 5"));
    assert!(!has_result("2 + 3 ="));
    assert!(!has_result("2 + 3 = # only a comment"));
    assert!(!has_result("> Hosts: 254"));
    assert!(!has_result("plain text"));
}

#[test]
fn test_separator_offset_on_multibyte_text() {
    let line = "2 × 3 = 6";
    let offset = separator_offset(line).unwrap();
    assert_eq!(&line[offset..offset + 1], "=");
}
