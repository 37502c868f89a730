//! Handler chains: ordered, independent phrase matchers
//!
//! A [`Handler`] looks at one expression (and its lowercased form) and either
//! claims it, producing result text, or says it is not its phrasing. A
//! [`HandlerChain`] tries its handlers strictly in order and stops at the
//! first claim, so more specific phrasings must be registered before more
//! general ones (`wildcard mask for` before `mask for`).

use std::fmt;

use tracing::trace;

use super::error::DomainError;

/// What a handler made of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The handler recognised the phrasing and computed this text.
    /// Lines after the first become continuation lines.
    Claimed(String),
    /// Not this handler's phrasing.
    NotMine,
}

impl HandlerOutcome {
    pub fn claimed(text: impl Into<String>) -> Self {
        Self::Claimed(text.into())
    }

    pub fn is_claimed(&self) -> bool {
        matches!(self, Self::Claimed(_))
    }
}

/// Result of running one handler.
pub type HandlerResult = Result<HandlerOutcome, DomainError>;

/// A single phrase matcher.
///
/// Handlers are pure: the same input always produces the same outcome.
/// `Err` means the phrasing matched but the values were unusable.
pub trait Handler: Send + Sync {
    /// Short name used in traces.
    fn name(&self) -> &'static str;

    /// Try to claim `expr`. `lower` is `expr` lowercased.
    fn handle(&self, expr: &str, lower: &str) -> HandlerResult;
}

/// A [`Handler`] backed by a plain function.
#[derive(Clone, Copy)]
pub struct FnHandler {
    name: &'static str,
    run: fn(&str, &str) -> HandlerResult,
}

impl FnHandler {
    pub const fn new(name: &'static str, run: fn(&str, &str) -> HandlerResult) -> Self {
        Self { name, run }
    }
}

impl fmt::Debug for FnHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnHandler").field(&self.name).finish()
    }
}

impl Handler for FnHandler {
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle(&self, expr: &str, lower: &str) -> HandlerResult {
        (self.run)(expr, lower)
    }
}

/// Ordered list of handlers; first claim wins.
#[derive(Default)]
pub struct HandlerChain {
    handlers: Vec<Box<dyn Handler>>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler after all existing ones.
    pub fn with(mut self, handler: impl Handler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Append a function handler.
    pub fn with_fn(self, name: &'static str, run: fn(&str, &str) -> HandlerResult) -> Self {
        self.with(FnHandler::new(name, run))
    }

    /// Handler names in the order they are tried.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.iter().map(|h| h.name())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Try every handler in order.
    ///
    /// Stops at the first claim or the first error.
    pub fn run(&self, expr: &str, lower: &str) -> HandlerResult {
        for handler in &self.handlers {
            let outcome = handler.handle(expr, lower)?;
            if outcome.is_claimed() {
                trace!(handler = handler.name(), "handler claimed expression");
                return Ok(outcome);
            }
        }
        Ok(HandlerOutcome::NotMine)
    }
}

impl fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
