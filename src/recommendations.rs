//! Chord and song recommendation flows.
//!
//! Each flow prompts a model, waits for the whole streamed answer and runs it
//! through extraction. Song suggestions are then enriched with media links.

use crate::extraction::{
    accumulate, extract_complementary_chords, extract_song_suggestions, fallback_song_list,
    ComplementaryChords, ExtractionFailure, JsonSpanStrategy, SongSuggestion,
};
use crate::llm::{CompletionOptions, LlmError, Message, ModelRegistry, ModelRole};
use crate::media::{EnrichmentDispatcher, EnrichmentReport};
use crate::prompts::{
    complementary_chords_prompt, json_system_prompt, song_suggestions_prompt, RequestHints,
    SONG_SUGGESTIONS_SYSTEM_PROMPT,
};
use crate::server::metrics;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct RecommendationSettings {
    pub strategy: JsonSpanStrategy,
    pub completion: CompletionOptions,
    /// Raw model output longer than this is truncated in logs.
    pub max_logged_chars: usize,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            strategy: JsonSpanStrategy::default(),
            completion: CompletionOptions::default(),
            max_logged_chars: 2000,
        }
    }
}

#[derive(Debug, Error)]
pub enum ChordPipelineError {
    #[error("model call failed: {0}")]
    Model(#[from] LlmError),

    #[error(transparent)]
    Extraction(#[from] ExtractionFailure),
}

#[derive(Debug, Clone)]
pub struct SongSuggestions {
    pub songs: Vec<SongSuggestion>,
    /// True when `songs` is the synthetic error record.
    pub fallback: bool,
    pub rejected: usize,
    pub enrichment: EnrichmentReport,
}

#[derive(Debug, Clone)]
pub struct Recommendations {
    pub chords: ComplementaryChords,
    pub songs: SongSuggestions,
}

pub struct RecommendationService {
    models: Arc<ModelRegistry>,
    enricher: Arc<EnrichmentDispatcher>,
    settings: RecommendationSettings,
}

impl RecommendationService {
    pub fn new(
        models: Arc<ModelRegistry>,
        enricher: Arc<EnrichmentDispatcher>,
        settings: RecommendationSettings,
    ) -> Self {
        Self {
            models,
            enricher,
            settings,
        }
    }

    /// Ask the JSON model for chords complementing `selected`.
    pub async fn complementary_chords(
        &self,
        selected: &[String],
    ) -> Result<ComplementaryChords, ChordPipelineError> {
        let messages = [
            Message::system(json_system_prompt(&RequestHints::default())),
            Message::user(complementary_chords_prompt(selected)),
        ];
        let text = self.run_model(ModelRole::Json, &messages).await?;

        match extract_complementary_chords(&text, self.settings.strategy) {
            Ok(result) => {
                metrics::record_extraction("chords", "ok");
                debug!(
                    chords = ?result.complementary_chords,
                    analysis_defaulted = result.analysis_defaulted,
                    "Extracted complementary chords"
                );
                Ok(result)
            }
            Err(failure) => {
                self.log_failure("chords", &failure, &text);
                Err(failure.into())
            }
        }
    }

    /// Ask the chat model for songs matching the chords.
    ///
    /// Extraction failures yield the fallback song list instead of an error;
    /// only model failures are returned as errors.
    pub async fn song_suggestions(
        &self,
        selected: &[String],
        complementary: Option<&[String]>,
    ) -> Result<SongSuggestions, LlmError> {
        let messages = [
            Message::system(SONG_SUGGESTIONS_SYSTEM_PROMPT),
            Message::user(song_suggestions_prompt(selected, complementary)),
        ];
        let text = self.run_model(ModelRole::Chat, &messages).await?;

        let validated = match extract_song_suggestions(&text, self.settings.strategy) {
            Ok(validated) => validated,
            Err(failure) => {
                self.log_failure("songs", &failure, &text);
                return Ok(SongSuggestions {
                    songs: fallback_song_list(),
                    fallback: true,
                    rejected: 0,
                    enrichment: EnrichmentReport::default(),
                });
            }
        };

        metrics::record_extraction("songs", "ok");
        for rejected in &validated.rejected {
            metrics::record_rejected_song(&rejected.field);
        }
        if !validated.rejected.is_empty() {
            info!(
                accepted = validated.songs.len(),
                rejected = validated.rejected.len(),
                "Dropped invalid song records"
            );
        }

        let rejected = validated.rejected.len();
        let (songs, enrichment) = self.enricher.enrich(validated.songs).await;

        Ok(SongSuggestions {
            songs,
            fallback: false,
            rejected,
            enrichment,
        })
    }

    /// Full flow: chords first, then songs built on the extracted chords.
    pub async fn recommendations(
        &self,
        selected: &[String],
    ) -> Result<Recommendations, ChordPipelineError> {
        let chords = self.complementary_chords(selected).await?;
        let songs = self
            .song_suggestions(selected, Some(&chords.complementary_chords))
            .await?;
        Ok(Recommendations { chords, songs })
    }

    async fn run_model(&self, role: ModelRole, messages: &[Message]) -> Result<String, LlmError> {
        let provider = self.models.get(role)?;
        let options = &self.settings.completion;
        let start = Instant::now();

        let call = async {
            let stream = provider.stream(messages, options).await?;
            accumulate(stream).await
        };
        let result = tokio::time::timeout(options.timeout, call)
            .await
            .unwrap_or(Err(LlmError::Timeout));

        match result {
            Ok(accumulated) => {
                metrics::record_model_request(role.as_str(), "ok", start.elapsed());
                debug!(
                    role = %role,
                    model = provider.model(),
                    chunks = accumulated.chunks,
                    chars = accumulated.text.len(),
                    output = %truncate_for_log(&accumulated.text, self.settings.max_logged_chars),
                    "Model response received"
                );
                Ok(accumulated.text)
            }
            Err(e) => {
                metrics::record_model_request(role.as_str(), e.kind(), start.elapsed());
                warn!(role = %role, model = provider.model(), error = %e, "Model call failed");
                Err(e)
            }
        }
    }

    fn log_failure(&self, schema: &str, failure: &ExtractionFailure, text: &str) {
        metrics::record_extraction(schema, failure.kind().as_str());
        let field = match failure {
            ExtractionFailure::SchemaViolation { field, .. } => field.as_str(),
            _ => "",
        };
        warn!(
            schema,
            kind = %failure.kind(),
            field,
            error = %failure,
            output = %truncate_for_log(text, self.settings.max_logged_chars),
            "Extraction failed"
        );
    }
}

/// Cut `text` to at most `max_chars` characters for logging.
fn truncate_for_log(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}... ({} bytes total)", &text[..idx], text.len()),
        None => text.to_string(),
    }
}
