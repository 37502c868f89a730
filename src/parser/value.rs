//! Values produced by the expression parser

/// A number threaded through evaluation together with its percent flag.
///
/// `is_percent` is only ever true for a percent literal (or a percent
/// literal wrapped in parentheses or a sign). Any arithmetic clears it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Value {
    pub number: f64,
    pub is_percent: bool,
}

impl Value {
    pub fn number(number: f64) -> Self {
        Self {
            number,
            is_percent: false,
        }
    }

    /// A percent literal: `20` becomes `0.20`, flagged.
    pub fn percent(points: f64) -> Self {
        Self {
            number: points / 100.0,
            is_percent: true,
        }
    }

    /// Same number, percent flag cleared.
    pub fn plain(self) -> Self {
        Self::number(self.number)
    }
}

/// The result of a whole expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Number(Value),
    /// Result of a comparison
    Boolean(bool),
}

impl Outcome {
    /// Numeric view used when other lines reference this result.
    ///
    /// Booleans read as `1` and `0`.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Number(value) => value.number,
            Self::Boolean(true) => 1.0,
            Self::Boolean(false) => 0.0,
        }
    }
}
