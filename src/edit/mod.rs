//! Keeping `\N` references pointed at the same lines across edits
//!
//! When a line is inserted or deleted, every line below it changes number.
//! [`adjust_references`] compares the document before and after a single
//! contiguous edit and renumbers references so they keep naming the lines
//! they named before.
//!
//! Only one contiguous insert or delete is modelled: the edit is located at
//! the first logical line where the two versions differ, and its size is the
//! difference in logical line counts.

use std::borrow::Cow;

use tracing::debug;

use crate::base::{LineKind, classify, is_continuation, rewrite_references, separator_offset};

/// A single contiguous change in logical line count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Same number of logical lines
    Unchanged,
    /// `count` lines inserted before 0-based logical line `at`
    Inserted { at: usize, count: usize },
    /// `count` lines removed starting at 0-based logical line `at`
    Deleted { at: usize, count: usize },
}

impl Edit {
    /// Where reference `target` (1-based) points after the edit.
    ///
    /// References into a deleted block are left dangling as written.
    pub fn renumber(&self, target: usize) -> usize {
        match *self {
            Self::Inserted { at, count } if target > at => target + count,
            Self::Deleted { at, count } if target > at + count => target - count,
            _ => target,
        }
    }
}

/// Locate the single contiguous edit between two documents.
pub fn detect_edit(old_text: &str, new_text: &str) -> Edit {
    let old: Vec<&str> = logical_lines(old_text).collect();
    let new: Vec<&str> = logical_lines(new_text).collect();
    if old.len() == new.len() {
        return Edit::Unchanged;
    }

    let at = old
        .iter()
        .zip(&new)
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| old.len().min(new.len()));

    if new.len() > old.len() {
        Edit::Inserted {
            at,
            count: new.len() - old.len(),
        }
    } else {
        Edit::Deleted {
            at,
            count: old.len() - new.len(),
        }
    }
}

/// Rewrite `\N` references in `new_text` so they follow a single insert or
/// delete made to `old_text`.
///
/// Inserted lines, comments and continuation lines are left as typed.
/// Equal logical line counts return `new_text` unchanged.
pub fn adjust_references(old_text: &str, new_text: &str) -> String {
    let edit = detect_edit(old_text, new_text);
    if edit == Edit::Unchanged {
        return new_text.to_string();
    }
    debug!(?edit, "renumbering references");

    let inserted = match edit {
        Edit::Inserted { at, count } => at..at + count,
        _ => 0..0,
    };

    let mut logical = 0;
    new_text
        .split('\n')
        .map(|line| {
            if is_continuation(line) {
                return Cow::Borrowed(line);
            }
            let index = logical;
            logical += 1;
            if inserted.contains(&index) || classify(line) == LineKind::Comment {
                return Cow::Borrowed(line);
            }
            renumber_line(line, edit)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rewrite references left of the result separator only; results and
/// inline comments are kept verbatim.
fn renumber_line(line: &str, edit: Edit) -> Cow<'_, str> {
    let split = separator_offset(line).unwrap_or(line.len());
    let (expression, rest) = line.split_at(split);
    match rewrite_references(expression, |target| edit.renumber(target)) {
        Cow::Borrowed(_) => Cow::Borrowed(line),
        Cow::Owned(expression) => Cow::Owned(expression + rest),
    }
}

fn logical_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').filter(|line| !is_continuation(line))
}
