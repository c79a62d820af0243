//! Session-scoped state owned by the hosting UI.
//!
//! A session holds the latest recommendation outcome, which of its
//! suggestions is expanded, and whether a submission is outstanding. Only
//! the submission flow writes the outcome; only user interaction writes the
//! selection.

use tracing::error;

use crate::domain::outcome::RecommendationOutcome;
use crate::domain::suggestion::{Suggestion, SuggestionSet};
use crate::errors::SessionError;

/// Which suggestion (by position in the current set) is expanded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    expanded: Option<usize>,
}

impl SelectionState {
    /// Selecting a position outside `set` is a caller bug: it panics in
    /// debug builds and is ignored in release builds.
    pub fn select(&mut self, set: &SuggestionSet, index: usize) {
        if set.get(index).is_none() {
            precondition_violation(&format!("suggestion index {index} is outside the current set"));
            return;
        }
        self.expanded = Some(index);
    }

    pub fn clear(&mut self) {
        self.expanded = None;
    }

    pub fn index(&self) -> Option<usize> {
        self.expanded
    }

    pub fn current<'a>(&self, set: &'a SuggestionSet) -> Option<&'a Suggestion> {
        self.expanded.and_then(|index| set.get(index))
    }
}

fn precondition_violation(message: &str) {
    error!(event_name = "session.precondition_violation", detail = message, "selection ignored");
    debug_assert!(false, "precondition violation: {message}");
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    InFlight,
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    outcome: Option<RecommendationOutcome>,
    selection: SelectionState,
    phase: SubmissionPhase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn can_submit(&self) -> bool {
        self.phase == SubmissionPhase::Idle
    }

    /// Marks a submission as outstanding. Fails while another one is.
    pub fn begin_submission(&mut self) -> Result<(), SessionError> {
        if self.phase == SubmissionPhase::InFlight {
            return Err(SessionError::SubmissionInFlight);
        }
        self.phase = SubmissionPhase::InFlight;
        Ok(())
    }

    /// Ends the outstanding submission without a new result, e.g. when the
    /// selection was rejected before any request was sent.
    pub fn abort_submission(&mut self) {
        self.phase = SubmissionPhase::Idle;
    }

    /// Stores the outcome of the outstanding submission, replacing any
    /// previous one and collapsing the expanded suggestion.
    pub fn complete_submission(
        &mut self,
        outcome: RecommendationOutcome,
    ) -> Result<(), SessionError> {
        if self.phase != SubmissionPhase::InFlight {
            return Err(SessionError::NoSubmissionInFlight);
        }
        self.install(outcome);
        self.phase = SubmissionPhase::Idle;
        Ok(())
    }

    pub fn install(&mut self, outcome: RecommendationOutcome) {
        self.outcome = Some(outcome);
        self.selection.clear();
    }

    pub fn outcome(&self) -> Option<&RecommendationOutcome> {
        self.outcome.as_ref()
    }

    pub fn suggestions(&self) -> Option<&SuggestionSet> {
        self.outcome.as_ref().map(|outcome| &outcome.suggestions)
    }

    pub fn select(&mut self, index: usize) {
        match self.outcome.as_ref() {
            Some(outcome) => self.selection.select(&outcome.suggestions, index),
            None => precondition_violation("no suggestions to select from"),
        }
    }

    pub fn select_brand(&mut self, brand: &str) {
        let position = self.suggestions().and_then(|set| set.position_of(brand));
        match position {
            Some(index) => self.select(index),
            None => precondition_violation(&format!("brand `{brand}` is not in the current set")),
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected(&self) -> Option<&Suggestion> {
        self.suggestions().and_then(|set| self.selection.current(set))
    }
}
