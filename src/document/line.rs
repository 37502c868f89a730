use crate::base::constants::CONTINUATION_PREFIX;
use crate::domain::DateTimeValue;

/// The outcome of one logical line in one pass.
///
/// Created fresh on every pass and never changed once the next line starts.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EvaluatedLine {
    /// The line as it came in
    pub input: String,
    /// The rendered line: `<expr> = <result>[ <comment>]`, or the input
    /// unchanged for lines that are not evaluated
    pub output: String,
    /// Further result lines, already prefixed with `> `
    pub continuations: Vec<String>,
    /// Numeric value later lines can reference
    pub value: Option<f64>,
    /// Whether the line produced a result (false for `ERR` and pass-through)
    pub has_result: bool,
    /// Whether the line involves money, directly or through a reference
    pub is_currency: bool,
    /// Date/time value later date arithmetic can chain from
    pub date_time: Option<DateTimeValue>,
    /// Name of the evaluator that claimed the line
    pub evaluator: Option<&'static str>,
}

impl EvaluatedLine {
    /// A line copied through without evaluation.
    pub fn passthrough(input: &str) -> Self {
        Self {
            input: input.to_string(),
            output: input.to_string(),
            ..Self::default()
        }
    }

    /// The output line followed by its continuation lines.
    pub fn rendered_lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.output.as_str()).chain(self.continuations.iter().map(String::as_str))
    }

    /// All rendered lines joined with `\n`.
    pub fn rendered(&self) -> String {
        self.rendered_lines().collect::<Vec<_>>().join("\n")
    }

    pub(super) fn continuation(text: &str) -> String {
        format!("{CONTINUATION_PREFIX}{text}")
    }
}

/// What a host needs to show one logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineRecord {
    /// 1-based logical line number, the `N` in `\N`
    pub line_number: usize,
    pub input: String,
    /// Rendered text, continuation lines included
    pub output: String,
}

impl From<(usize, &EvaluatedLine)> for LineRecord {
    fn from((index, line): (usize, &EvaluatedLine)) -> Self {
        Self {
            line_number: index + 1,
            input: line.input.clone(),
            output: line.rendered(),
        }
    }
}
