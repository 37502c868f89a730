use chrono::NaiveDateTime;

use crate::domain::GrammarSet;

/// Options for an evaluation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Domain grammars offered to every line
    pub grammars: GrammarSet,
    /// Instant `now` and `today` refer to; sampled from the local clock once
    /// per pass when unset
    pub reference_time: Option<NaiveDateTime>,
    /// Put single spaces around binary operators of non-active lines
    pub normalize_spacing: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            grammars: GrammarSet::Standard,
            reference_time: None,
            normalize_spacing: true,
        }
    }
}

impl EngineOptions {
    pub fn with_grammars(mut self, grammars: GrammarSet) -> Self {
        self.grammars = grammars;
        self
    }

    pub fn with_reference_time(mut self, reference_time: NaiveDateTime) -> Self {
        self.reference_time = Some(reference_time);
        self
    }

    pub fn with_normalize_spacing(mut self, normalize_spacing: bool) -> Self {
        self.normalize_spacing = normalize_spacing;
        self
    }
}
