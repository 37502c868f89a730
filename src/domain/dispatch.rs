//! Ordered domain dispatch
//!
//! Evaluators are tried in registry order; the first one whose pre-filter
//! passes and whose evaluation claims the expression wins. A declined or
//! failed attempt falls through to the next evaluator.

use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::arithmetic::{ARITHMETIC, ArithmeticEvaluator};
use super::context::{EvalContext, Evaluation};
use super::datetime::DateTimeEvaluator;
use super::error::EvalError;
use super::evaluator::DomainEvaluator;
use super::network::network_evaluator;
use super::percentage::percentage_evaluator;
use super::permissions::permissions_evaluator;
use super::programmer::programmer_evaluator;

/// Which domain grammars a dispatcher carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GrammarSet {
    /// network, datetime, arithmetic
    #[default]
    Standard,
    /// Standard plus permissions, programmer and percentage
    Extended,
}

/// A claimed evaluation and the evaluator that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub evaluator: &'static str,
    pub evaluation: Evaluation,
}

/// Registry of domain evaluators, keyed by name, in dispatch order.
#[derive(Default)]
pub struct Dispatcher {
    evaluators: IndexMap<&'static str, Box<dyn DomainEvaluator>>,
}

impl Dispatcher {
    /// A dispatcher with no evaluators; every dispatch is unclaimed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// `network` → `datetime` → `arithmetic`.
    pub fn standard() -> Self {
        Self::empty()
            .with(network_evaluator())
            .with(DateTimeEvaluator::new())
            .with(ArithmeticEvaluator::new())
    }

    /// The standard order with the optional grammars ahead of arithmetic.
    pub fn extended() -> Self {
        let mut dispatcher = Self::standard();
        dispatcher.register(permissions_evaluator());
        dispatcher.register(programmer_evaluator());
        dispatcher.register(percentage_evaluator());
        dispatcher
    }

    pub fn for_grammars(grammars: GrammarSet) -> Self {
        match grammars {
            GrammarSet::Standard => Self::standard(),
            GrammarSet::Extended => Self::extended(),
        }
    }

    /// Append an evaluator, or replace the one with the same name in place.
    pub fn with(mut self, evaluator: impl DomainEvaluator + 'static) -> Self {
        self.evaluators.insert(evaluator.name(), Box::new(evaluator));
        self
    }

    /// Register an evaluator upstream of arithmetic.
    ///
    /// An evaluator with an existing name replaces that one in place.
    pub fn register(&mut self, evaluator: impl DomainEvaluator + 'static) {
        let name = evaluator.name();
        if let Some(slot) = self.evaluators.get_mut(name) {
            *slot = Box::new(evaluator);
            return;
        }
        let index = self
            .evaluators
            .get_index_of(ARITHMETIC)
            .unwrap_or(self.evaluators.len());
        self.evaluators.shift_insert(index, name, Box::new(evaluator));
    }

    /// Evaluator names in dispatch order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.evaluators.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }

    /// Find the first evaluator that claims `expr`.
    ///
    /// When nothing claims it, the error of the last failed attempt is
    /// returned, or [`EvalError::Unclaimed`] if every evaluator declined.
    pub fn dispatch(&self, expr: &str, ctx: &EvalContext<'_>) -> Result<Dispatched, EvalError> {
        let lower = expr.to_lowercase();
        let mut last_error = None;

        for (&name, evaluator) in &self.evaluators {
            if !evaluator.looks_like_mine(expr, &lower) {
                continue;
            }
            match evaluator.evaluate(expr, &lower, ctx) {
                Ok(Some(evaluation)) => {
                    debug!(line = ctx.line_number(), evaluator = name, "claimed");
                    return Ok(Dispatched {
                        evaluator: name,
                        evaluation,
                    });
                }
                Ok(None) => trace!(line = ctx.line_number(), evaluator = name, "declined"),
                Err(err) => {
                    trace!(line = ctx.line_number(), evaluator = name, %err, "failed");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or(EvalError::Unclaimed))
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
