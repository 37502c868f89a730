//! # tally-base
//!
//! Core library for reference-aware, line-oriented calculation documents.
//!
//! A document is a list of lines; every line ending in `=` is evaluated and
//! its result written after the `=`. Later lines can use earlier results by
//! position (`\1`, `\2`, ...), and those references are renumbered when lines
//! are inserted or deleted.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! edit      → Reference renumbering across edits
//!   ↓
//! document  → Per-document pass, EvaluatedLine, Engine
//!   ↓
//! domain    → Dispatcher, domain grammars (network, datetime, ...)
//!   ↓
//! format    → Result text for numbers, currency, booleans
//!   ↓
//! parser    → Logos lexer, operator-precedence parser, percent values
//!   ↓
//! base      → Single-line classification, `\N` scanning, constants
//! ```
//!
//! ## Example
//!
//! ```
//! use tally::Engine;
//!
//! let engine = Engine::new();
//! let lines = engine.evaluate_document(&["100 =", "\\1 * 2 ="]);
//! assert_eq!(lines[1].output, "\\1 * 2 = 200");
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → format → domain → document → edit)
// ============================================================================

/// Foundation: line classification, reference scanning, constants
pub mod base;

/// Parser: Logos lexer, precedence-climbing evaluator
pub mod parser;

/// Result formatting
pub mod format;

/// Domain evaluators and dispatch
pub mod domain;

/// Whole-document evaluation
pub mod document;

/// Reference renumbering
pub mod edit;

// Re-export the host-facing surface
pub use base::{LineKind, classify, has_result, split_assignment, strip_result};
pub use document::{Engine, EngineOptions, EvaluatedLine, LineRecord, evaluate_document};
pub use domain::{DateTimeValue, Dispatcher, DomainError, EvalError, GrammarSet, Precision};
pub use edit::{Edit, adjust_references, detect_edit};
pub use parser::{LexError, Outcome, ParseError, Value};
