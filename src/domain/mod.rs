//! Domain evaluation
//!
//! Every expression is offered to a [`Dispatcher`], which asks each registered
//! [`DomainEvaluator`] in turn. Phrase-based grammars are built from
//! [`HandlerChain`]s of small, pure [`Handler`]s; arithmetic sits last and
//! takes whatever nobody else claimed.
//!
//! ## Module layout
//!
//! ```text
//! dispatch     → Dispatcher, GrammarSet
//!   ↓
//! network      → CIDR grammar (handler-chain exemplar)
//! datetime     → dates, times, offsets, differences
//! percentage   → "P% of X" and friends
//! programmer   → number bases
//! permissions  → chmod bits
//! arithmetic   → tokenizer + parser + formatter
//!   ↓
//! evaluator    → DomainEvaluator, ChainEvaluator
//! handler      → Handler, HandlerChain, HandlerOutcome
//! context      → EvalContext, Evaluation
//! error        → DomainError, EvalError
//! ```

mod arithmetic;
mod context;
pub mod datetime;
mod dispatch;
mod error;
mod evaluator;
mod handler;
pub mod network;
mod percentage;
mod permissions;
mod programmer;

pub use arithmetic::{ARITHMETIC, ArithmeticEvaluator};
pub use context::{EvalContext, Evaluation};
pub use datetime::{DATETIME, DateTimeEvaluator, DateTimeValue, Precision};
pub use dispatch::{Dispatched, Dispatcher, GrammarSet};
pub use error::{DomainError, EvalError};
pub use evaluator::{ChainEvaluator, DomainEvaluator, PreFilter, parse_display_number};
pub use handler::{FnHandler, Handler, HandlerChain, HandlerOutcome, HandlerResult};
pub use network::{NETWORK, network_evaluator};
pub use percentage::{PERCENTAGE, percentage_evaluator};
pub use permissions::{PERMISSIONS, permissions_evaluator};
pub use programmer::{PROGRAMMER, programmer_evaluator};
