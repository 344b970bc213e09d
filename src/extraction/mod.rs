//! Turning free-text model output into validated records.
//!
//! Every extraction runs the same steps: accumulate the streamed text, locate
//! the JSON span, validate it against the target schema. Failures are plain
//! values ([`ExtractionFailure`]) that the fallback composer maps to payloads
//! the callers can always render.

mod accumulator;
mod chords;
mod fallback;
mod json_span;
mod songs;

pub use accumulator::{accumulate, AccumulatedText};
pub use chords::{validate_chord_analysis, ComplementaryChords, ProgressionAnalysis};
pub use fallback::{
    chord_fallback, fallback_song_list, ChordFallback, FALLBACK_SONG_ARTIST,
    FALLBACK_SONG_DESCRIPTION, FALLBACK_SONG_NAME,
};
pub use json_span::{
    extract_json_span, extract_validated, Delimiters, JsonSpanStrategy,
};
pub use songs::{validate_song_list, Difficulty, RejectedSong, SongSuggestion, ValidatedSongs};

use thiserror::Error;

/// Why model output could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    #[error("no JSON value found in model output")]
    NoJsonFound,

    #[error("model output is not valid JSON: {0}")]
    ParseError(String),

    #[error("field '{field}' {reason}")]
    SchemaViolation { field: String, reason: String },
}

impl ExtractionFailure {
    pub fn violation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaViolation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NoJsonFound => FailureKind::NoJsonFound,
            Self::ParseError(_) => FailureKind::ParseError,
            Self::SchemaViolation { .. } => FailureKind::SchemaViolation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NoJsonFound,
    ParseError,
    SchemaViolation,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::NoJsonFound => "NoJsonFound",
            FailureKind::ParseError => "ParseError",
            FailureKind::SchemaViolation => "SchemaViolation",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one extraction: the validated payload or the reason it failed.
pub type ExtractionOutcome<T> = Result<T, ExtractionFailure>;

/// Locate and validate the chord analysis object in `text`.
pub fn extract_complementary_chords(
    text: &str,
    strategy: JsonSpanStrategy,
) -> ExtractionOutcome<ComplementaryChords> {
    extract_validated(text, strategy, Delimiters::Braces, validate_chord_analysis)
}

/// Locate and validate the song list in `text`.
pub fn extract_song_suggestions(
    text: &str,
    strategy: JsonSpanStrategy,
) -> ExtractionOutcome<ValidatedSongs> {
    extract_validated(
        text,
        strategy,
        Delimiters::BracesOrBrackets,
        validate_song_list,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_pipeline_from_prose() {
        let text = r#"Here you go: {"complementary_chords":["Dm","Em"]}"#;
        let result = extract_complementary_chords(text, JsonSpanStrategy::Greedy).unwrap();
        assert_eq!(result.complementary_chords, vec!["Dm", "Em"]);
        assert!(result.analysis_defaulted);
    }

    #[test]
    fn test_chord_pipeline_failure_kinds() {
        let cases = [
            ("I would suggest Dm and Em.", FailureKind::NoJsonFound),
            ("{complementary_chords: [Dm]}", FailureKind::ParseError),
            (r#"{"chords":["Dm"]}"#, FailureKind::SchemaViolation),
        ];
        for (text, kind) in cases {
            let failure =
                extract_complementary_chords(text, JsonSpanStrategy::Greedy).unwrap_err();
            assert_eq!(failure.kind(), kind, "{}", text);
        }
    }

    #[test]
    fn test_song_pipeline_rejects_bare_object() {
        let text = r#"{"songName":"X","artist":"Y","description":"Z","difficulty":"Beginner"}"#;
        let failure = extract_song_suggestions(text, JsonSpanStrategy::Greedy).unwrap_err();
        assert_eq!(failure.kind(), FailureKind::SchemaViolation);
    }

    #[test]
    fn test_song_pipeline_partial_acceptance() {
        let text = r#"Sure! [
            {"songName":"Let It Be","artist":"The Beatles","description":"I-V-vi-IV","difficulty":"beginner"},
            {"songName":"X","artist":"Y","description":"Z","difficulty":"expert"}
        ]"#;
        let result = extract_song_suggestions(text, JsonSpanStrategy::Balanced).unwrap();
        assert_eq!(result.songs.len(), 1);
        assert_eq!(result.songs[0].difficulty, Difficulty::Beginner);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].index, 1);
        assert_eq!(result.rejected[0].field, "difficulty");
    }

    #[test]
    fn test_balanced_chords_skip_empty_prose_object() {
        let text = r#"Use {} notation. {"complementary_chords":["Dm"]}"#;
        let result = extract_complementary_chords(text, JsonSpanStrategy::Balanced).unwrap();
        assert_eq!(result.complementary_chords, vec!["Dm"]);
    }

    #[test]
    fn test_balanced_songs_skip_prose_array() {
        let text = r#"Pick songs from [1]: [{"songName":"Let It Be","artist":"The Beatles","description":"I-V-vi-IV","difficulty":"Beginner"}]"#;
        let result = extract_song_suggestions(text, JsonSpanStrategy::Balanced).unwrap();
        assert_eq!(result.songs.len(), 1);
        assert_eq!(result.songs[0].song_name, "Let It Be");
        assert!(result.rejected.is_empty());
    }

    #[test]
    fn test_balanced_failure_kind_comes_from_first_candidate() {
        let text = r#"See {C} and {"chords":["Dm"]}"#;
        let failure = extract_complementary_chords(text, JsonSpanStrategy::Balanced).unwrap_err();
        assert_eq!(failure.kind(), FailureKind::ParseError);
    }

    #[test]
    fn test_failure_display() {
        assert_eq!(
            ExtractionFailure::violation("difficulty", "is required").to_string(),
            "field 'difficulty' is required"
        );
        assert_eq!(FailureKind::ParseError.to_string(), "ParseError");
    }
}
