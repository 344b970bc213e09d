use crate::llm::{LlmError, TextStream};
use futures::StreamExt;

/// Full text of a finished model response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccumulatedText {
    pub text: String,
    /// Number of chunks the stream delivered.
    pub chunks: usize,
}

/// Drain `stream` into a single buffer.
///
/// Returns only once the stream is exhausted; any chunk error aborts the
/// whole accumulation since partial model output is never extracted.
pub async fn accumulate(mut stream: TextStream) -> Result<AccumulatedText, LlmError> {
    let mut accumulated = AccumulatedText::default();
    while let Some(chunk) = stream.next().await {
        accumulated.text.push_str(&chunk?);
        accumulated.chunks += 1;
    }
    Ok(accumulated)
}
