//! Core of the outdoor brand recommendation pipeline.
//!
//! Everything here is deterministic and free of I/O except the knowledge
//! file loader: preference capture, request building, strict validation of
//! the model's answer, the static fallback, eco-tier classification, the
//! chart projection and session state. The network call lives in
//! `naked-agent`.

pub mod comparison;
pub mod config;
pub mod domain;
pub mod eco_tier;
pub mod errors;
pub mod fallback;
pub mod knowledge;
pub mod request;
pub mod schema;
pub mod session;

pub use comparison::{project, ComparisonChart, ComparisonPoint};
pub use domain::outcome::{OutcomeSummary, RecommendationOutcome, ResultSource};
pub use domain::preferences::{
    Activity, MaterialPreference, PreferenceSelection, SubmittableSelection,
    SustainabilityPreference, UnknownOption, WeatherCondition,
};
pub use domain::suggestion::{Suggestion, SuggestionSet, SUGGESTIONS_PER_SET};
pub use eco_tier::EcoTier;
pub use errors::{SchemaViolation, SelectionError, ServiceError, SessionError};
pub use fallback::fallback;
pub use knowledge::{KnowledgeError, KnowledgeStore};
pub use request::{RecommendationRequest, RequestBuilder};
pub use schema::parse_suggestion_set;
pub use session::{SelectionState, Session, SubmissionPhase};
