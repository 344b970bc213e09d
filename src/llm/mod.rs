//! LLM provider abstraction layer.
//!
//! Providers expose completions as ordered streams of text chunks; the
//! registry maps each [`ModelRole`] to the provider configured for it.

mod openai;
mod provider;
mod registry;
mod sse;
mod types;

pub use openai::{ApiKeySource, OpenAIProvider};
pub use provider::{CompletionOptions, LlmError, LlmProvider};
pub use registry::{ModelRegistry, ModelRole};
pub use sse::{text_deltas, SseDecoder};
pub use types::{Message, MessageRole, TextStream};
