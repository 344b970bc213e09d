use super::{Difficulty, ExtractionFailure, FailureKind, SongSuggestion};
use serde::Serialize;

pub const FALLBACK_SONG_NAME: &str = "Error parsing suggestions";
pub const FALLBACK_SONG_ARTIST: &str = "Please try again";
pub const FALLBACK_SONG_DESCRIPTION: &str =
    "The AI response couldn't be parsed. Please try requesting song suggestions again.";

/// One-element song list standing in for suggestions that failed to extract.
pub fn fallback_song_list() -> Vec<SongSuggestion> {
    vec![SongSuggestion::new(
        FALLBACK_SONG_NAME,
        FALLBACK_SONG_ARTIST,
        FALLBACK_SONG_DESCRIPTION,
        Difficulty::Beginner,
    )]
}

/// Payload returned when chord analysis extraction fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordFallback {
    pub complementary_chords: Vec<String>,
    pub error: String,
    pub details: String,
}

pub fn chord_fallback(failure: &ExtractionFailure) -> ChordFallback {
    let kind = failure.kind();
    let error = match kind {
        FailureKind::NoJsonFound => "Invalid response format from AI",
        FailureKind::ParseError => "Failed to parse AI response",
        FailureKind::SchemaViolation => "Invalid response structure from AI",
    };
    ChordFallback {
        complementary_chords: Vec::new(),
        error: error.to_string(),
        details: format!("{}: {}", kind, failure),
    }
}
