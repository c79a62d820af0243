use std::time::Duration;

use async_trait::async_trait;
use naked_core::config::LlmConfig;
use naked_core::{RecommendationRequest, SchemaViolation, ServiceError};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::error;

/// Sends a recommendation request to a generative model and returns the raw
/// text of its answer. One call is one attempt.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn complete(&self, request: &RecommendationRequest) -> Result<String, ServiceError>;
}

/// OpenAI-compatible `/chat/completions` endpoint (OpenAI, LiteLLM, vLLM, ...).
pub struct ChatCompletionsTransport {
    client: Client,
    endpoint: String,
    api_key: Option<SecretString>,
    model: String,
    temperature: f32,
    timeout_secs: u64,
}

impl ChatCompletionsTransport {
    pub fn new(config: &LlmConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| ServiceError::transport(format!("failed to build HTTP client: {error}")))?;

        Ok(Self {
            client,
            endpoint: chat_completions_url(&config.base_url),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionTransport for ChatCompletionsTransport {
    async fn complete(&self, request: &RecommendationRequest) -> Result<String, ServiceError> {
        let body = chat_completion_body(request, &self.model, self.temperature);
        let mut builder = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }

        let response = builder.send().await.map_err(|error| {
            let message = if error.is_timeout() {
                format!("model request timed out after {}s", self.timeout_secs)
            } else if error.is_connect() {
                format!("could not connect to {}: {error}", self.endpoint)
            } else {
                format!("model request failed: {error}")
            };
            error!(event_name = "llm.request.failed", endpoint = %self.endpoint, detail = %message);
            ServiceError::transport(message)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|error| {
            ServiceError::transport(format!("failed to read model response body: {error}"))
        })?;

        if !status.is_success() {
            let message = status_message(status, &text);
            error!(event_name = "llm.request.rejected", status = %status, detail = %message);
            return Err(ServiceError::transport(message));
        }

        extract_message_content(&text).map_err(ServiceError::from)
    }
}

fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim().trim_end_matches('/'))
}

/// JSON body for a chat completion that forces a JSON-object answer.
pub fn chat_completion_body(request: &RecommendationRequest, model: &str, temperature: f32) -> Value {
    json!({
        "model": model,
        "temperature": temperature,
        "messages": [
            {"role": "system", "content": request.system_instructions},
            {"role": "user", "content": request.user_payload.to_string()},
        ],
        "response_format": {"type": "json_object"},
    })
}

/// Pulls `choices[0].message.content` out of a chat completion envelope.
pub fn extract_message_content(body: &str) -> Result<String, SchemaViolation> {
    let envelope: Value = serde_json::from_str(body)
        .map_err(|error| SchemaViolation::InvalidJson(format!("completion envelope: {error}")))?;

    envelope
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            SchemaViolation::InvalidJson("completion envelope has no message content".to_string())
        })
}

fn status_message(status: StatusCode, body: &str) -> String {
    let detail: String = body.chars().take(300).collect();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("model endpoint rejected credentials ({status}): {detail}")
        }
        _ => format!("model endpoint returned {status}: {detail}"),
    }
}
