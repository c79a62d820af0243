use thiserror::Error;

use crate::domain::preferences::MAX_FREE_TEXT_CHARS;

/// Reasons a preference selection cannot be submitted.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("at least one activity must be selected")]
    NoActivities,
    #[error("description is {len} characters long (limit is {MAX_FREE_TEXT_CHARS})")]
    FreeTextTooLong { len: usize },
}

impl SelectionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NoActivities => "Please select at least one Activity.",
            Self::FreeTextTooLong { .. } => "Please shorten the additional description.",
        }
    }
}

/// A specific rule the model response broke.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SchemaViolation {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("response root is not a JSON object")]
    RootNotObject,
    #[error("response is missing the `suggestions` field")]
    MissingSuggestions,
    #[error("`suggestions` is not an array")]
    SuggestionsNotArray,
    #[error("expected exactly 3 suggestions, got {0}")]
    WrongSuggestionCount(usize),
    #[error("suggestion {index} is not a JSON object")]
    EntryNotObject { index: usize },
    #[error("suggestion {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },
    #[error("suggestion {index} field `{field}` has the wrong type (expected {expected})")]
    WrongFieldType { index: usize, field: &'static str, expected: &'static str },
    #[error("suggestion {index} field `{field}` must not be empty")]
    EmptyField { index: usize, field: &'static str },
    #[error("suggestion {index} field `{field}` is {value}, outside {range}")]
    OutOfRange { index: usize, field: String, value: f64, range: &'static str },
    #[error("suggestion {index} scores material `{material}` which it does not list")]
    UnlistedMaterialScore { index: usize, material: String },
    #[error("brand `{brand}` appears more than once")]
    DuplicateBrand { brand: String },
}

/// Failure of a single recommendation service call.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ServiceError {
    #[error("transport failure: {message}")]
    Transport { message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] SchemaViolation),
}

impl ServiceError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport_error",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }

    /// Warning shown next to fallback results.
    pub fn user_message(&self) -> String {
        format!("Model error: {self}. Showing fallback data.")
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a recommendation request is already in flight")]
    SubmissionInFlight,
    #[error("no recommendation request is in flight")]
    NoSubmissionInFlight,
}
