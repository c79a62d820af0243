//! Model side of the recommendation pipeline.
//!
//! The model only proposes brands. Whether its answer is usable is decided by
//! the strict schema in `naked-core`, and any failure ends in the static
//! fallback set rather than an error.
//!
//! - `llm` - transport seam plus the OpenAI-compatible chat completions client
//! - `client` - one call, one schema check
//! - `runtime` - selection validation, request building and fallback

pub mod client;
pub mod llm;
pub mod runtime;

pub use client::RecommendationClient;
pub use llm::{ChatCompletionsTransport, CompletionTransport};
pub use runtime::{RecommendationPipeline, SubmitError};
