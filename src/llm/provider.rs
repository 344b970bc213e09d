//! LLM provider trait definition.

use super::types::{Message, TextStream};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Options for a completion request.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Request timeout, covering the whole streamed body.
    pub timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: None,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,

    #[error("Stream interrupted: {0}")]
    Stream(String),

    #[error("No model registered for role '{0}'")]
    UnknownModel(String),
}

impl LlmError {
    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::Connection(_) => "connection",
            LlmError::Api { .. } => "api",
            LlmError::InvalidResponse(_) => "invalid_response",
            LlmError::RateLimited => "rate_limited",
            LlmError::Timeout => "timeout",
            LlmError::Stream(_) => "stream",
            LlmError::UnknownModel(_) => "unknown_model",
        }
    }
}

/// Trait for LLM providers.
///
/// Implementations connect to a concrete backend while exposing the completion
/// as an ordered stream of text chunks.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider's name (e.g., "openai").
    fn name(&self) -> &str;

    /// Get the model being used.
    fn model(&self) -> &str;

    /// Start a streamed completion of the conversation.
    ///
    /// Resolves once the upstream accepted the request; the returned stream
    /// yields the generated text chunk by chunk.
    async fn stream(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<TextStream, LlmError>;

    /// Check if the provider is healthy and reachable.
    async fn health_check(&self) -> Result<(), LlmError>;
}
