//! Foundation types for the tally toolchain.
//!
//! This module provides the single-line vocabulary used everywhere else:
//! - [`LineKind`] and [`classify`] - what a raw line is
//! - [`split_assignment`] - expression / result / comment split at `=`
//! - [`strip_result`], [`has_result`] - host utilities on one line
//! - [`reference_targets`], [`rewrite_references`] - `\N` scanning
//! - Document constants (continuation prefix, error marker, sigils)
//!
//! This module has NO dependencies on other tally modules.

pub mod constants;
mod line;
mod references;

pub use line::{
    Assignment, LineKind, classify, has_result, is_continuation, separator_offset,
    split_assignment, strip_result,
};
pub use references::{
    reference_targets, references_line, rewrite_references, rewrite_references_with,
};

#[cfg(test)]
mod tests;
