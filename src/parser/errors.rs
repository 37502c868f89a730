//! Lexer and parser error types
//!
//! Offsets are byte positions into the normalized expression text.

use smol_str::SmolStr;
use text_size::TextSize;
use thiserror::Error;

/// Errors raised while turning an expression into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// `\` not followed by a line number.
    #[error("dangling reference sigil at {offset:?}")]
    DanglingReference { offset: TextSize },

    /// `$` not followed by an amount, or an amount with a `%` suffix.
    #[error("malformed currency literal at {offset:?}")]
    DanglingCurrency { offset: TextSize },

    /// A character no token starts with.
    #[error("unexpected character {ch:?} at {offset:?}")]
    UnexpectedCharacter { ch: char, offset: TextSize },
}

impl LexError {
    /// Offset of the offending input.
    pub fn offset(&self) -> TextSize {
        match self {
            Self::DanglingReference { offset }
            | Self::DanglingCurrency { offset }
            | Self::UnexpectedCharacter { offset, .. } => *offset,
        }
    }
}

/// Errors raised while evaluating a token stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Input ended where an operand or `)` was required.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// A token that cannot appear at this position.
    #[error("unexpected {found} at {offset:?}")]
    UnexpectedToken { found: String, offset: TextSize },

    /// `(` without its `)`.
    #[error("unmatched parenthesis opened at {offset:?}")]
    UnmatchedParen { offset: TextSize },

    /// Name followed by `(` that is not in the function table.
    #[error("unknown function `{0}`")]
    UnknownFunction(SmolStr),

    /// Bare name that is neither a constant nor a function call.
    #[error("unknown identifier `{0}`")]
    UnknownIdentifier(SmolStr),

    /// Reference to a line that does not exist or produced no result.
    #[error("unresolved reference \\{0}")]
    UnresolvedReference(usize),

    /// Reference to the line being evaluated.
    #[error("line \\{0} refers to itself")]
    SelfReference(usize),

    /// Reference to a line after the one being evaluated.
    #[error("forward reference to line \\{0}")]
    ForwardReference(usize),

    /// Reference to a line whose result is not a number.
    #[error("line \\{0} has no numeric value")]
    NonNumericReference(usize),

    /// A reference appeared but no resolver was configured.
    #[error("no resolver configured for reference \\{0}")]
    NoResolver(usize),

    /// `a < b < c` style chains.
    #[error("comparisons cannot be chained")]
    ChainedComparison,
}

impl ParseError {
    /// Create an unexpected-token error from anything displayable.
    pub fn unexpected(found: impl std::fmt::Display, offset: TextSize) -> Self {
        Self::UnexpectedToken {
            found: found.to_string(),
            offset,
        }
    }
}
