//! The domain evaluator contract and the handler-chain evaluator

use std::fmt;

use super::context::{EvalContext, Evaluation};
use super::error::EvalError;
use super::handler::{HandlerChain, HandlerOutcome};
use crate::base::constants::REFERENCE_SIGIL;

/// One domain grammar plugged into dispatch.
///
/// Dispatch first asks [`DomainEvaluator::looks_like_mine`], which must be
/// cheap. Only then is [`DomainEvaluator::evaluate`] called; it may still
/// decline with `Ok(None)` or fail with an error, and dispatch moves on to
/// the next evaluator either way.
pub trait DomainEvaluator: Send + Sync {
    /// Unique name; also the dispatcher's registry key.
    fn name(&self) -> &'static str;

    /// Cheap pre-filter on the raw and lowercased expression.
    fn looks_like_mine(&self, expr: &str, lower: &str) -> bool;

    /// Evaluate the expression.
    fn evaluate(
        &self,
        expr: &str,
        lower: &str,
        ctx: &EvalContext<'_>,
    ) -> Result<Option<Evaluation>, EvalError>;
}

/// Pre-filter signature for [`ChainEvaluator`].
pub type PreFilter = fn(&str, &str) -> bool;

/// A [`DomainEvaluator`] made of a pre-filter and a [`HandlerChain`].
///
/// When reference expansion is enabled, `\N` references are replaced by the
/// referenced numbers before the chain runs, so handlers stay pure functions
/// of their text.
pub struct ChainEvaluator {
    name: &'static str,
    pre_filter: PreFilter,
    chain: HandlerChain,
    expand_references: bool,
    numeric_results: bool,
}

impl ChainEvaluator {
    pub fn new(name: &'static str, pre_filter: PreFilter, chain: HandlerChain) -> Self {
        Self {
            name,
            pre_filter,
            chain,
            expand_references: false,
            numeric_results: false,
        }
    }

    /// Substitute `\N` references before running the chain.
    pub fn expanding_references(mut self) -> Self {
        self.expand_references = true;
        self
    }

    /// Expose claimed text that reads as a number (`1,250`, `$30.00`) as the
    /// line's value.
    pub fn with_numeric_results(mut self) -> Self {
        self.numeric_results = true;
        self
    }

    pub fn chain(&self) -> &HandlerChain {
        &self.chain
    }
}

impl DomainEvaluator for ChainEvaluator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn looks_like_mine(&self, expr: &str, lower: &str) -> bool {
        (self.pre_filter)(expr, lower)
    }

    fn evaluate(
        &self,
        expr: &str,
        lower: &str,
        ctx: &EvalContext<'_>,
    ) -> Result<Option<Evaluation>, EvalError> {
        let outcome = if self.expand_references && expr.contains(REFERENCE_SIGIL) {
            let expanded = ctx.expand_references(expr)?;
            self.chain.run(&expanded, &expanded.to_lowercase())?
        } else {
            self.chain.run(expr, lower)?
        };

        Ok(match outcome {
            HandlerOutcome::NotMine => None,
            HandlerOutcome::Claimed(text) => {
                let value = self
                    .numeric_results
                    .then(|| parse_display_number(&text))
                    .flatten();
                Some(Evaluation {
                    text,
                    value,
                    date_time: None,
                })
            }
        })
    }
}

impl fmt::Debug for ChainEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainEvaluator")
            .field("name", &self.name)
            .field("chain", &self.chain)
            .finish()
    }
}

/// Read back a number rendered by the formatter.
///
/// Accepts an optional leading `-`, an optional `$` and `,` grouping.
pub fn parse_display_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let rest = rest.strip_prefix('$').unwrap_or(rest);
    if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.') {
        return None;
    }
    let number: f64 = rest.replace(',', "").parse().ok()?;
    Some(if negative { -number } else { number })
}
