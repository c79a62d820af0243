use naked_core::{parse_suggestion_set, RecommendationRequest, ServiceError, SuggestionSet};
use tracing::{info, warn};

use crate::llm::CompletionTransport;

/// Sends one request and holds the answer to the response contract. Only the
/// shape of the answer is checked, not whether the brands are good picks.
pub struct RecommendationClient<T> {
    transport: T,
}

impl<T> RecommendationClient<T>
where
    T: CompletionTransport,
{
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn submit(
        &self,
        request: &RecommendationRequest,
        request_id: &str,
    ) -> Result<SuggestionSet, ServiceError> {
        let raw = self.transport.complete(request).await.map_err(|error| {
            warn!(
                event_name = "pipeline.submit.failed",
                request_id,
                error_class = error.kind(),
                error = %error,
                "model call failed"
            );
            error
        })?;

        let suggestions = parse_suggestion_set(&raw).map_err(|violation| {
            let error = ServiceError::from(violation);
            warn!(
                event_name = "pipeline.response.rejected",
                request_id,
                error_class = error.kind(),
                error = %error,
                response_chars = raw.chars().count(),
                "model response violated the suggestion schema"
            );
            error
        })?;

        info!(
            event_name = "pipeline.response.accepted",
            request_id,
            brands = ?suggestions.iter().map(|s| s.brand.as_str()).collect::<Vec<_>>(),
            "model suggestions accepted"
        );
        Ok(suggestions)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use naked_core::{RecommendationRequest, SchemaViolation, ServiceError};
    use serde_json::{json, Value};

    use super::RecommendationClient;
    use crate::llm::CompletionTransport;

    /// Transport that replays a canned answer and records what it was sent.
    pub(crate) struct ScriptedTransport {
        reply: Result<String, ServiceError>,
        pub(crate) calls: AtomicUsize,
        pub(crate) last_request: Mutex<Option<RecommendationRequest>>,
    }

    impl ScriptedTransport {
        pub(crate) fn replying(body: impl Into<String>) -> Self {
            Self::with_reply(Ok(body.into()))
        }

        pub(crate) fn failing(error: ServiceError) -> Self {
            Self::with_reply(Err(error))
        }

        fn with_reply(reply: Result<String, ServiceError>) -> Self {
            Self { reply, calls: AtomicUsize::new(0), last_request: Mutex::new(None) }
        }
    }

    #[async_trait]
    impl CompletionTransport for ScriptedTransport {
        async fn complete(&self, request: &RecommendationRequest) -> Result<String, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut last) = self.last_request.lock() {
                *last = Some(request.clone());
            }
            self.reply.clone()
        }
    }

    pub(crate) fn entry(brand: &str, eco_score: f64) -> Value {
        json!({
            "brand": brand,
            "brand_eco_score": eco_score,
            "avg_price": 140.0,
            "materials": ["Recycled Nylon", "Organic Cotton"],
            "material_eco_scores": {"Recycled Nylon": 0.65, "Organic Cotton": 0.6},
            "alternative_materials": ["Hemp"],
            "reasoning": "Lightweight and weather resistant"
        })
    }

    pub(crate) fn valid_reply() -> String {
        json!({"suggestions": [entry("Patagonia", 0.82), entry("Vaude", 0.74), entry("Columbia", 0.3)]})
            .to_string()
    }

    fn request() -> RecommendationRequest {
        RecommendationRequest {
            system_instructions: "instructions".to_string(),
            user_payload: json!({"activity": ["Hiking"]}),
        }
    }

    #[tokio::test]
    async fn accepts_schema_conforming_reply() {
        let client = RecommendationClient::new(ScriptedTransport::replying(valid_reply()));

        let set = client.submit(&request(), "req-1").await.expect("valid reply");

        assert_eq!(set.suggestions()[1].brand, "Vaude");
        assert_eq!(client.transport().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn two_suggestions_are_malformed() {
        let reply = json!({"suggestions": [entry("Patagonia", 0.8), entry("Vaude", 0.7)]});
        let client = RecommendationClient::new(ScriptedTransport::replying(reply.to_string()));

        let error = client.submit(&request(), "req-2").await.expect_err("two entries");

        assert_eq!(error, ServiceError::MalformedResponse(SchemaViolation::WrongSuggestionCount(2)));
    }

    #[tokio::test]
    async fn eco_score_above_one_is_malformed() {
        let reply =
            json!({"suggestions": [entry("Patagonia", 1.4), entry("Vaude", 0.7), entry("Columbia", 0.3)]});
        let client = RecommendationClient::new(ScriptedTransport::replying(reply.to_string()));

        let error = client.submit(&request(), "req-3").await.expect_err("score out of range");

        assert_eq!(error.kind(), "malformed_response");
    }

    #[tokio::test]
    async fn non_json_reply_is_malformed() {
        let client = RecommendationClient::new(ScriptedTransport::replying("Here are 3 brands: ..."));

        let error = client.submit(&request(), "req-4").await.expect_err("prose reply");

        assert!(matches!(error, ServiceError::MalformedResponse(SchemaViolation::InvalidJson(_))));
    }

    #[tokio::test]
    async fn transport_failure_is_passed_through_without_retry() {
        let client = RecommendationClient::new(ScriptedTransport::failing(ServiceError::transport(
            "connection refused",
        )));

        let error = client.submit(&request(), "req-5").await.expect_err("transport down");

        assert_eq!(error, ServiceError::transport("connection refused"));
        assert_eq!(client.transport().calls.load(Ordering::SeqCst), 1);
    }
}
