//! The per-document evaluation pass

use std::fmt;

use chrono::{Local, NaiveDateTime};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::line::{EvaluatedLine, LineRecord};
use super::options::EngineOptions;
use super::spacing::normalize_spacing;
use crate::base::constants::{CURRENCY_SIGIL, ERROR_MARKER};
use crate::base::{
    LineKind, classify, is_continuation, reference_targets, references_line, split_assignment,
};
use crate::domain::{DomainEvaluator, Dispatched, Dispatcher, EvalContext};

/// Evaluates whole documents.
///
/// Immutable once built; every call works on its own state, so one engine
/// can serve any number of passes and threads.
pub struct Engine {
    options: EngineOptions,
    dispatcher: Dispatcher,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            options,
            dispatcher: Dispatcher::for_grammars(options.grammars),
        }
    }

    /// Register an extra evaluator upstream of arithmetic.
    pub fn with_evaluator(mut self, evaluator: impl DomainEvaluator + 'static) -> Self {
        self.dispatcher.register(evaluator);
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Evaluate every line with no active line.
    pub fn evaluate_document<S: AsRef<str>>(&self, lines: &[S]) -> Vec<EvaluatedLine> {
        self.evaluate_document_at(lines, None)
    }

    /// Evaluate every line; `active_line` (1-based, logical) keeps its
    /// spacing as typed.
    pub fn evaluate_document_at<S: AsRef<str>>(
        &self,
        lines: &[S],
        active_line: Option<usize>,
    ) -> Vec<EvaluatedLine> {
        self.pass(lines, active_line, None).unwrap_or_default()
    }

    /// Like [`Engine::evaluate_document_at`], but gives up between lines once
    /// `cancel` fires, returning `None`.
    pub fn evaluate_cancellable<S: AsRef<str>>(
        &self,
        lines: &[S],
        active_line: Option<usize>,
        cancel: &CancellationToken,
    ) -> Option<Vec<EvaluatedLine>> {
        self.pass(lines, active_line, Some(cancel))
    }

    /// Evaluate a whole text and return it rendered.
    ///
    /// Stale continuation lines are replaced by fresh ones; a trailing newline
    /// is kept.
    pub fn render(&self, text: &str) -> String {
        let lines: Vec<&str> = text.lines().collect();
        let mut rendered = self
            .evaluate_document(&lines)
            .iter()
            .flat_map(|line| line.rendered_lines().map(str::to_string).collect::<Vec<_>>())
            .collect::<Vec<_>>()
            .join("\n");
        if text.ends_with('\n') {
            rendered.push('\n');
        }
        rendered
    }

    /// Evaluate and flatten into host-facing records.
    pub fn records<S: AsRef<str>>(&self, lines: &[S]) -> Vec<LineRecord> {
        self.records_at(lines, None)
    }

    /// [`Engine::records`] with an active line, as in
    /// [`Engine::evaluate_document_at`].
    pub fn records_at<S: AsRef<str>>(
        &self,
        lines: &[S],
        active_line: Option<usize>,
    ) -> Vec<LineRecord> {
        self.evaluate_document_at(lines, active_line)
            .iter()
            .enumerate()
            .map(LineRecord::from)
            .collect()
    }

    /// Logical lines whose expression references line `changed` directly.
    pub fn dependents<S: AsRef<str>>(&self, lines: &[S], changed: usize) -> Vec<usize> {
        logical_lines(lines)
            .enumerate()
            .filter(|(_, line)| classify(line) == LineKind::Expression)
            .filter_map(|(index, line)| {
                let expression = split_assignment(line)?.expression;
                references_line(expression, changed).then_some(index + 1)
            })
            .collect()
    }

    fn pass<S: AsRef<str>>(
        &self,
        lines: &[S],
        active_line: Option<usize>,
        cancel: Option<&CancellationToken>,
    ) -> Option<Vec<EvaluatedLine>> {
        let now = self
            .options
            .reference_time
            .unwrap_or_else(|| Local::now().naive_local());
        let mut evaluated: Vec<EvaluatedLine> = Vec::with_capacity(lines.len());

        for (index, line) in logical_lines(lines).enumerate() {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                debug!(line = index + 1, "evaluation cancelled");
                return None;
            }
            let line_number = index + 1;
            let result = self.evaluate_line(
                line,
                line_number,
                &evaluated,
                now,
                active_line == Some(line_number),
            );
            evaluated.push(result);
        }

        debug!(lines = evaluated.len(), "document evaluated");
        Some(evaluated)
    }

    fn evaluate_line(
        &self,
        line: &str,
        line_number: usize,
        prior: &[EvaluatedLine],
        now: NaiveDateTime,
        is_active: bool,
    ) -> EvaluatedLine {
        if classify(line).is_passthrough() {
            return EvaluatedLine::passthrough(line);
        }
        let Some(assignment) = split_assignment(line) else {
            return EvaluatedLine::passthrough(line);
        };

        let expression = if self.options.normalize_spacing && !is_active {
            normalize_spacing(assignment.expression)
        } else {
            assignment.expression.to_string()
        };
        let is_currency = involves_currency(&expression, line_number, prior);
        let ctx = EvalContext::new(line_number, prior, now).with_currency(is_currency);
        let render = |result: &str| match assignment.comment {
            Some(comment) => format!("{expression} = {result} {comment}"),
            None => format!("{expression} = {result}"),
        };

        match self.dispatcher.dispatch(&expression, &ctx) {
            Ok(Dispatched {
                evaluator,
                evaluation,
            }) => {
                let mut results = evaluation.text.lines();
                let output = render(results.next().unwrap_or_default());
                trace!(line = line_number, evaluator, %output, "line evaluated");
                EvaluatedLine {
                    input: line.to_string(),
                    output,
                    continuations: results.map(EvaluatedLine::continuation).collect(),
                    value: evaluation.value,
                    has_result: true,
                    is_currency,
                    date_time: evaluation.date_time,
                    evaluator: Some(evaluator),
                }
            }
            Err(err) => {
                debug!(line = line_number, %err, "line failed");
                EvaluatedLine {
                    input: line.to_string(),
                    output: render(ERROR_MARKER),
                    is_currency,
                    ..EvaluatedLine::default()
                }
            }
        }
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

/// Evaluate a document with a default engine.
pub fn evaluate_document<S: AsRef<str>>(lines: &[S]) -> Vec<EvaluatedLine> {
    Engine::new().evaluate_document(lines)
}

/// Lines that take part in numbering: everything but continuation lines.
fn logical_lines<S: AsRef<str>>(lines: &[S]) -> impl Iterator<Item = &str> {
    lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|line| !is_continuation(line))
}

/// `$` in the expression itself, or a reference to an earlier currency line.
fn involves_currency(expression: &str, line_number: usize, prior: &[EvaluatedLine]) -> bool {
    expression.contains(CURRENCY_SIGIL)
        || reference_targets(expression)
            .filter(|&target| target < line_number)
            .filter_map(|target| target.checked_sub(1).and_then(|i| prior.get(i)))
            .any(|line| line.is_currency)
}
