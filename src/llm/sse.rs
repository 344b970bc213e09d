//! Server-sent events decoding for streamed chat completions.

use super::provider::LlmError;
use super::types::TextStream;
use futures::stream::{self, BoxStream, StreamExt};
use serde::Deserialize;
use std::collections::VecDeque;

const DONE_MARKER: &str = "[DONE]";

/// Incremental decoder turning raw bytes into SSE `data` payloads.
///
/// Only complete lines are decoded, so multi-byte characters split across
/// network chunks are reassembled before UTF-8 conversion.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes and return the payloads of every event completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            self.consume_line(line.trim_end_matches(['\n', '\r']), &mut events);
        }
        events
    }

    /// Flush whatever is left once the byte stream ended.
    pub fn finish(&mut self) -> Option<String> {
        if !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&raw).into_owned();
            let mut events = Vec::new();
            self.consume_line(line.trim_end_matches('\r'), &mut events);
            if let Some(event) = events.pop() {
                return Some(event);
            }
        }
        self.take_event()
    }

    fn consume_line(&mut self, line: &str, events: &mut Vec<String>) {
        if line.is_empty() {
            if let Some(event) = self.take_event() {
                events.push(event);
            }
            return;
        }
        // Comments (":") and other fields (event, id, retry) carry no text.
        if let Some(rest) = line.strip_prefix("data:") {
            self.data_lines
                .push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
        }
    }

    fn take_event(&mut self) -> Option<String> {
        if self.data_lines.is_empty() {
            return None;
        }
        let event = self.data_lines.join("\n");
        self.data_lines.clear();
        Some(event)
    }
}

#[derive(Debug, Deserialize)]
struct ChunkPayload {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    error: Option<ChunkError>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkError {
    message: Option<String>,
}

enum Payload {
    Text(Option<String>),
    Done,
}

fn parse_payload(payload: &str) -> Result<Payload, LlmError> {
    let payload = payload.trim();
    if payload == DONE_MARKER {
        return Ok(Payload::Done);
    }
    let chunk: ChunkPayload = serde_json::from_str(payload)
        .map_err(|e| LlmError::InvalidResponse(format!("Malformed stream chunk: {}", e)))?;
    if let Some(err) = chunk.error {
        return Err(LlmError::Stream(
            err.message.unwrap_or_else(|| "upstream reported an error".to_string()),
        ));
    }
    let text = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .filter(|s| !s.is_empty());
    Ok(Payload::Text(text))
}

struct DecodeState<B> {
    bytes: BoxStream<'static, Result<B, LlmError>>,
    decoder: SseDecoder,
    pending: VecDeque<Result<String, LlmError>>,
    finished: bool,
}

impl<B> DecodeState<B> {
    fn absorb(&mut self, payloads: Vec<String>) {
        for payload in payloads {
            if self.finished {
                return;
            }
            match parse_payload(&payload) {
                Ok(Payload::Text(Some(text))) => self.pending.push_back(Ok(text)),
                Ok(Payload::Text(None)) => {}
                Ok(Payload::Done) => self.finished = true,
                Err(e) => {
                    self.pending.push_back(Err(e));
                    self.finished = true;
                }
            }
        }
    }
}

/// Turn an OpenAI-style SSE byte stream into a stream of content deltas.
///
/// The stream ends at the `[DONE]` marker, at the end of the byte stream, or
/// right after the first error.
pub fn text_deltas<B>(bytes: BoxStream<'static, Result<B, LlmError>>) -> TextStream
where
    B: AsRef<[u8]> + Send + 'static,
{
    let state = DecodeState {
        bytes,
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let payloads = state.decoder.push(chunk.as_ref());
                    state.absorb(payloads);
                }
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(e), state));
                }
                None => {
                    let tail: Vec<String> = state.decoder.finish().into_iter().collect();
                    state.absorb(tail);
                    state.finished = true;
                }
            }
        }
    })
    .boxed()
}
