//! Document evaluation
//!
//! A pass takes the lines of a document, drops stale `> ` continuation lines,
//! and evaluates the remaining (logical) lines strictly top to bottom. Line
//! `N` may only read lines `1..N`, which is what makes `\N` references
//! well-defined: each [`EvaluatedLine`] is written once, at its own index.
//!
//! ```text
//! 100 =                 →  100 = 100
//! \1 * 2 =              →  \1 * 2 = 200
//! 10.0.0.0/30 =         →  10.0.0.0/30 = Network: 10.0.0.0/30
//!                          > Mask: 255.255.255.252
//!                          > ...
//! ```

mod engine;
mod line;
mod options;
mod spacing;

pub use engine::{Engine, evaluate_document};
pub use line::{EvaluatedLine, LineRecord};
pub use options::EngineOptions;
pub use spacing::normalize_spacing;
