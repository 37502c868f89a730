//! Expression tokenizer and operator-precedence parser
//!
//! This module turns the text left of a line's `=` into a number using:
//! - **logos** for fast lexing
//! - a hand-written precedence-climbing parser that evaluates as it goes
//!
//! ## Architecture
//!
//! ```text
//! Expression text
//!     ↓
//! normalize → ASCII operators, `x` as multiplication
//!     ↓
//! Lexer (logos) → Tokens with byte ranges
//!     ↓
//! Parser → Outcome (number with percent flag, or boolean)
//! ```
//!
//! References (`\N`) are resolved through a [`ReferenceResolver`] supplied by
//! the caller. The parser itself knows nothing about documents.

#[allow(clippy::module_inception)]
mod parser;

mod errors;
mod functions;
mod lexer;
mod value;

pub use errors::{LexError, ParseError};
pub use functions::{Function, lookup_constant, lookup_function};
pub use lexer::{Token, TokenKind, normalize, tokenize};
pub use parser::{Parser, ReferenceResolver, evaluate};
pub use value::{Outcome, Value};

/// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};

#[cfg(test)]
mod tests;
