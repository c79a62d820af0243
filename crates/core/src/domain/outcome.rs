use serde::Serialize;

use crate::domain::suggestion::SuggestionSet;
use crate::errors::ServiceError;
use crate::fallback::fallback;

#[derive(Clone, Debug, PartialEq)]
pub enum ResultSource {
    Model,
    Fallback { error: ServiceError },
}

/// A suggestion set together with where it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct RecommendationOutcome {
    pub suggestions: SuggestionSet,
    pub source: ResultSource,
}

impl RecommendationOutcome {
    pub fn from_model(suggestions: SuggestionSet) -> Self {
        Self { suggestions, source: ResultSource::Model }
    }

    pub fn from_fallback(error: ServiceError) -> Self {
        Self { suggestions: fallback(), source: ResultSource::Fallback { error } }
    }

    /// Any service failure is replaced by the fallback set, keeping the
    /// error so it can still be shown.
    pub fn from_result(result: Result<SuggestionSet, ServiceError>) -> Self {
        result.map(Self::from_model).unwrap_or_else(Self::from_fallback)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ResultSource::Fallback { .. })
    }

    pub fn error(&self) -> Option<&ServiceError> {
        match &self.source {
            ResultSource::Model => None,
            ResultSource::Fallback { error } => Some(error),
        }
    }

    pub fn warning(&self) -> Option<String> {
        self.error().map(ServiceError::user_message)
    }

    pub fn summary(&self) -> OutcomeSummary<'_> {
        OutcomeSummary {
            source: if self.is_fallback() { "fallback" } else { "model" },
            error_class: self.error().map(ServiceError::kind),
            warning: self.warning(),
            suggestions: &self.suggestions,
        }
    }
}

/// Serializable view of an outcome for machine-readable output.
#[derive(Debug, Serialize)]
pub struct OutcomeSummary<'a> {
    pub source: &'static str,
    pub error_class: Option<&'static str>,
    pub warning: Option<String>,
    #[serde(flatten)]
    pub suggestions: &'a SuggestionSet,
}
