//! `\N` reference scanning within a single line.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(\d+)").unwrap());

/// Line numbers referenced by `text`, in order of appearance.
///
/// Numbers too large for `usize` are skipped.
pub fn reference_targets(text: &str) -> impl Iterator<Item = usize> + '_ {
    REFERENCE
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse().ok())
}

/// Check whether `text` references line `line`.
pub fn references_line(text: &str, line: usize) -> bool {
    reference_targets(text).any(|target| target == line)
}

/// Rewrite every `\N` in `text` through `renumber`.
///
/// Returns the input unchanged (borrowed) when there is nothing to rewrite.
pub fn rewrite_references(text: &str, renumber: impl Fn(usize) -> usize) -> Cow<'_, str> {
    rewrite_references_with(text, |target| format!("\\{}", renumber(target)))
}

/// Replace every `\N` in `text` with whatever `replace` returns for `N`.
///
/// References too large for `usize` are left as written.
pub fn rewrite_references_with(
    text: &str,
    mut replace: impl FnMut(usize) -> String,
) -> Cow<'_, str> {
    REFERENCE.replace_all(text, |caps: &Captures<'_>| match caps[1].parse::<usize>() {
        Ok(target) => replace(target),
        Err(_) => caps[0].to_string(),
    })
}
