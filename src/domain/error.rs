//! Error types for domain evaluation.

use std::net::Ipv4Addr;

use thiserror::Error;

use crate::parser::{LexError, ParseError};

/// A domain grammar recognised the phrasing but could not compute it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Text in address position is not a dotted IPv4 address.
    #[error("invalid IPv4 address `{0}`")]
    InvalidAddress(String),

    /// Prefix length outside `0..=32` or not a number.
    #[error("invalid prefix length `{0}`")]
    InvalidPrefix(String),

    /// A mask whose one-bits are not contiguous from the top.
    #[error("mask {0} is not contiguous")]
    NonContiguousMask(Ipv4Addr),

    /// A split that needs more prefix bits than an address has.
    #[error("cannot split /{prefix} into /{wanted}")]
    InfeasibleSplit { prefix: u8, wanted: u32 },

    /// Address arithmetic ran past `255.255.255.255`.
    #[error("address overflow: {0}")]
    Overflow(String),

    /// Date or time text that does not name a real instant.
    #[error("invalid date/time `{0}`")]
    InvalidDateTime(String),

    /// Anything else a handler rejects after claiming the phrasing.
    #[error("{domain}: {message}")]
    Malformed {
        domain: &'static str,
        message: String,
    },
}

impl DomainError {
    /// Create an invalid address error.
    pub fn invalid_address(text: impl Into<String>) -> Self {
        Self::InvalidAddress(text.into())
    }

    /// Create an invalid prefix error.
    pub fn invalid_prefix(text: impl Into<String>) -> Self {
        Self::InvalidPrefix(text.into())
    }

    /// Create an overflow error.
    pub fn overflow(message: impl Into<String>) -> Self {
        Self::Overflow(message.into())
    }

    /// Create a malformed phrase error.
    pub fn malformed(domain: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            domain,
            message: message.into(),
        }
    }
}

/// Any failure while evaluating one line.
///
/// The orchestrator collapses all of these into `ERR` for the failing line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("lex error: {0}")]
    Lex(LexError),

    #[error("parse error: {0}")]
    Parse(ParseError),

    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// No evaluator accepted the expression.
    #[error("no evaluator understood the expression")]
    Unclaimed,
}

impl From<LexError> for EvalError {
    fn from(err: LexError) -> Self {
        Self::Lex(err)
    }
}

impl From<ParseError> for EvalError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Lex(lex) => Self::Lex(lex),
            other => Self::Parse(other),
        }
    }
}
