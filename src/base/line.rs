//! Single-line classification and the host utilities built on it.
//!
//! Everything here looks at exactly one line of text. Nothing in this module
//! knows about other lines of the document.

use super::constants::{COMMENT_PREFIX, CONTINUATION_PREFIX, RESULT_SEPARATOR};

/// What a raw line of a document is, before any evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Empty or whitespace only
    Blank,
    /// Starts with `#`
    Comment,
    /// Starts with `> `; output regenerated by the line above it
    Continuation,
    /// Has text but no standalone `=` yet
    Pending,
    /// Has a standalone `=` with a non-empty left side
    Expression,
}

impl LineKind {
    /// Lines that are copied through a pass untouched.
    pub fn is_passthrough(&self) -> bool {
        !matches!(self, Self::Expression)
    }
}

/// A line split at its result separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment<'a> {
    /// Trimmed text left of `=`
    pub expression: &'a str,
    /// Trimmed previously computed value right of `=`, without the comment
    pub result: &'a str,
    /// Inline comment right of `=`, including its `#`
    pub comment: Option<&'a str>,
}

/// Classify a single line.
pub fn classify(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if is_continuation(line) {
        return LineKind::Continuation;
    }
    if trimmed.starts_with(COMMENT_PREFIX) {
        return LineKind::Comment;
    }
    match split_assignment(line) {
        Some(assignment) if !assignment.expression.is_empty() => LineKind::Expression,
        _ => LineKind::Pending,
    }
}

/// Check whether a line is a continuation of the result above it.
#[inline]
pub fn is_continuation(line: &str) -> bool {
    line.trim_start().starts_with(CONTINUATION_PREFIX)
}

/// Byte offset of the first `=` that is a result separator.
///
/// An `=` belonging to `==`, `!=`, `<=` or `>=` is part of a comparison and
/// is skipped.
pub fn separator_offset(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    bytes.iter().enumerate().find_map(|(i, &b)| {
        if b != RESULT_SEPARATOR as u8 {
            return None;
        }
        let prev = i.checked_sub(1).map(|p| bytes[p]);
        let next = bytes.get(i + 1).copied();
        let in_operator =
            matches!(prev, Some(b'=' | b'!' | b'<' | b'>')) || matches!(next, Some(b'='));
        (!in_operator).then_some(i)
    })
}

/// Split a line at its first standalone `=`.
///
/// Returns `None` when the line has no result separator.
pub fn split_assignment(line: &str) -> Option<Assignment<'_>> {
    let offset = separator_offset(line)?;
    let expression = line[..offset].trim();
    let rest = &line[offset + 1..];

    let (result, comment) = match rest.find(COMMENT_PREFIX) {
        Some(hash) => (rest[..hash].trim(), Some(rest[hash..].trim_end())),
        None => (rest.trim(), None),
    };

    Some(Assignment {
        expression,
        result,
        comment,
    })
}

/// Drop the computed value from a line, keeping expression, `=` and any
/// inline comment.
///
/// Lines without a separator are returned unchanged.
pub fn strip_result(line: &str) -> String {
    match split_assignment(line) {
        Some(Assignment {
            expression,
            comment: Some(comment),
            ..
        }) => format!("{expression} = {comment}"),
        Some(Assignment { expression, .. }) => format!("{expression} ="),
        None => line.to_string(),
    }
}

/// Check whether a line already carries a computed value after its `=`.
pub fn has_result(line: &str) -> bool {
    if is_continuation(line) {
        return false;
    }
    split_assignment(line).is_some_and(|a| !a.expression.is_empty() && !a.result.is_empty())
}
