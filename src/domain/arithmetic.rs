//! The default domain: tokenizer + parser + formatter
//!
//! Arithmetic accepts everything in its pre-filter and sits last in
//! dispatch, so any expression the other grammars decline ends up here.

use tracing::trace;

use super::context::{EvalContext, Evaluation};
use super::error::EvalError;
use super::evaluator::DomainEvaluator;
use crate::format::format_outcome;

/// Registry name of the arithmetic evaluator.
pub const ARITHMETIC: &str = "arithmetic";

#[derive(Debug, Clone, Copy, Default)]
pub struct ArithmeticEvaluator;

impl ArithmeticEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl DomainEvaluator for ArithmeticEvaluator {
    fn name(&self) -> &'static str {
        ARITHMETIC
    }

    fn looks_like_mine(&self, _expr: &str, _lower: &str) -> bool {
        true
    }

    fn evaluate(
        &self,
        expr: &str,
        _lower: &str,
        ctx: &EvalContext<'_>,
    ) -> Result<Option<Evaluation>, EvalError> {
        let outcome = ctx.evaluate_arithmetic(expr)?;
        trace!(line = ctx.line_number(), ?outcome, "arithmetic result");

        let text = format_outcome(&outcome, ctx.is_currency());
        Ok(Some(Evaluation::text(text).with_value(outcome.as_f64())))
    }
}
