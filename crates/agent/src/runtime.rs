use std::sync::Arc;

use naked_core::{
    KnowledgeStore, PreferenceSelection, RecommendationOutcome, RequestBuilder, SelectionError,
    Session, SessionError,
};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::client::RecommendationClient;
use crate::llm::CompletionTransport;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    InvalidSelection(#[from] SelectionError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Preferences in, three suggestions out: validate, build the grounded
/// request, make one model call and fall back to static data on any failure.
pub struct RecommendationPipeline<T> {
    knowledge: Arc<KnowledgeStore>,
    client: RecommendationClient<T>,
}

impl<T> RecommendationPipeline<T>
where
    T: CompletionTransport,
{
    pub fn new(knowledge: Arc<KnowledgeStore>, transport: T) -> Self {
        Self { knowledge, client: RecommendationClient::new(transport) }
    }

    pub fn client(&self) -> &RecommendationClient<T> {
        &self.client
    }

    /// An invalid selection is returned as an error and nothing is sent.
    /// Service failures never surface as errors: they produce the fallback
    /// outcome, which carries the failure for display.
    pub async fn recommend(
        &self,
        selection: &PreferenceSelection,
    ) -> Result<RecommendationOutcome, SelectionError> {
        let request_id = Uuid::new_v4().to_string();
        let submittable = selection.validate().map_err(|error| {
            warn!(
                event_name = "pipeline.selection.rejected",
                request_id = %request_id,
                error = %error,
                "submission blocked"
            );
            error
        })?;

        let request = RequestBuilder::new(&self.knowledge).build(&submittable);
        info!(
            event_name = "pipeline.request.built",
            request_id = %request_id,
            activities = submittable.selection().activities().len(),
            instruction_chars = request.system_instructions.len(),
            "recommendation request built"
        );

        let outcome =
            RecommendationOutcome::from_result(self.client.submit(&request, &request_id).await);
        if let Some(error) = outcome.error() {
            warn!(
                event_name = "pipeline.fallback.used",
                request_id = %request_id,
                error_class = error.kind(),
                "showing fallback suggestions"
            );
        }

        Ok(outcome)
    }

    /// Runs one submission against `session`, refusing to start while another
    /// is outstanding. On success the new outcome replaces the old one and
    /// the expanded suggestion is cleared.
    pub async fn submit_into(
        &self,
        session: &mut Session,
        selection: &PreferenceSelection,
    ) -> Result<(), SubmitError> {
        session.begin_submission()?;
        match self.recommend(selection).await {
            Ok(outcome) => {
                session.complete_submission(outcome)?;
                Ok(())
            }
            Err(error) => {
                session.abort_submission();
                Err(error.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use naked_core::{
        fallback, Activity, EcoTier, KnowledgeStore, PreferenceSelection, SchemaViolation,
        SelectionError, ServiceError, Session, SessionError,
    };
    use serde_json::json;

    use super::{RecommendationPipeline, SubmitError};
    use crate::client::tests::{entry, valid_reply, ScriptedTransport};

    fn knowledge() -> Arc<KnowledgeStore> {
        Arc::new(
            KnowledgeStore::new(
                json!({"Mountain Equipment": {"eco_score": 0.45}, "Fjallraven": {"eco_score": 0.5}}),
                json!({"Recycled Polyester": {"eco_score": 0.7}}),
            )
            .expect("object documents"),
        )
    }

    fn hiking() -> PreferenceSelection {
        PreferenceSelection::new().with_activities([Activity::Hiking])
    }

    #[tokio::test]
    async fn hiking_with_transport_failure_yields_classified_fallback() {
        let pipeline = RecommendationPipeline::new(
            knowledge(),
            ScriptedTransport::failing(ServiceError::transport("connection refused")),
        );

        let outcome = pipeline.recommend(&hiking()).await.expect("selection is valid");

        let sent = pipeline.client().transport().last_request.lock().map(|r| r.clone());
        let sent = sent.expect("lock").expect("a request was sent");
        assert_eq!(sent.user_payload["activity"], json!(["Hiking"]));
        assert_eq!(sent.user_payload["weather"], json!([]));
        assert!(sent.system_instructions.contains(&knowledge().brand_profiles().to_string()));
        assert!(sent.system_instructions.contains(&knowledge().materials_profiles().to_string()));

        assert!(outcome.is_fallback());
        assert_eq!(outcome.suggestions, fallback());
        let tiers: Vec<EcoTier> =
            outcome.suggestions.iter().map(|s| EcoTier::classify(s.eco_score)).collect();
        assert_eq!(tiers[0], EcoTier::Moderate);
        assert!(outcome.warning().is_some_and(|w| w.contains("connection refused")));
    }

    #[tokio::test]
    async fn two_suggestion_reply_triggers_fallback() {
        let reply = json!({"suggestions": [entry("Patagonia", 0.8), entry("Vaude", 0.7)]});
        let pipeline =
            RecommendationPipeline::new(knowledge(), ScriptedTransport::replying(reply.to_string()));

        let outcome = pipeline.recommend(&hiking()).await.expect("selection is valid");

        assert_eq!(outcome.suggestions, fallback());
        assert_eq!(
            outcome.error(),
            Some(&ServiceError::MalformedResponse(SchemaViolation::WrongSuggestionCount(2)))
        );
    }

    #[tokio::test]
    async fn valid_reply_is_used_as_is() {
        let pipeline = RecommendationPipeline::new(knowledge(), ScriptedTransport::replying(valid_reply()));

        let outcome = pipeline.recommend(&hiking()).await.expect("selection is valid");

        assert!(!outcome.is_fallback());
        let brands: Vec<&str> = outcome.suggestions.iter().map(|s| s.brand.as_str()).collect();
        assert_eq!(brands, ["Patagonia", "Vaude", "Columbia"]);
    }

    #[tokio::test]
    async fn empty_activities_never_reach_the_model() {
        let pipeline = RecommendationPipeline::new(knowledge(), ScriptedTransport::replying(valid_reply()));

        let error = pipeline.recommend(&PreferenceSelection::new()).await.expect_err("no activity");

        assert_eq!(error, SelectionError::NoActivities);
        assert_eq!(pipeline.client().transport().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn submission_replaces_results_and_clears_selection() {
        let pipeline = RecommendationPipeline::new(knowledge(), ScriptedTransport::replying(valid_reply()));
        let mut session = Session::new();

        pipeline.submit_into(&mut session, &hiking()).await.expect("first submission");
        session.select_brand("Vaude");
        assert!(session.selected().is_some());

        pipeline.submit_into(&mut session, &hiking()).await.expect("second submission");
        assert_eq!(session.selected(), None);
        assert!(session.can_submit());
    }

    #[tokio::test]
    async fn rejected_selection_leaves_session_idle() {
        let pipeline = RecommendationPipeline::new(knowledge(), ScriptedTransport::replying(valid_reply()));
        let mut session = Session::new();

        let error = pipeline
            .submit_into(&mut session, &PreferenceSelection::new())
            .await
            .expect_err("no activity");

        assert_eq!(error, SubmitError::InvalidSelection(SelectionError::NoActivities));
        assert!(session.can_submit());
        assert!(session.outcome().is_none());
    }

    #[tokio::test]
    async fn in_flight_session_refuses_another_submission() {
        let pipeline = RecommendationPipeline::new(knowledge(), ScriptedTransport::replying(valid_reply()));
        let mut session = Session::new();
        session.begin_submission().expect("idle");

        let error = pipeline.submit_into(&mut session, &hiking()).await.expect_err("busy");

        assert_eq!(error, SubmitError::Session(SessionError::SubmissionInFlight));
        assert_eq!(pipeline.client().transport().calls.load(Ordering::SeqCst), 0);
    }
}
