use super::{ExtractionFailure, ExtractionOutcome};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Case-insensitive match against the canonical names.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

/// A suggested song. Media fields are only ever filled by enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongSuggestion {
    pub song_name: String,
    pub artist: String,
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chord_progression: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify_thumbnail: Option<String>,
}

impl SongSuggestion {
    pub fn new(
        song_name: impl Into<String>,
        artist: impl Into<String>,
        description: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            song_name: song_name.into(),
            artist: artist.into(),
            description: description.into(),
            difficulty,
            key: None,
            chord_progression: None,
            youtube_url: None,
            youtube_thumbnail: None,
            spotify_url: None,
            spotify_thumbnail: None,
        }
    }
}

/// A song record dropped during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedSong {
    /// Position of the record in the model's array.
    pub index: usize,
    pub field: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSongs {
    pub songs: Vec<SongSuggestion>,
    pub rejected: Vec<RejectedSong>,
}

/// Parse and validate a song list.
///
/// The top-level value must be an array; a lone object is a violation.
/// Invalid records are rejected one by one, the rest are kept. A list
/// left with no valid record fails as a whole.
pub fn validate_song_list(span: &str) -> ExtractionOutcome<ValidatedSongs> {
    let value: Value =
        serde_json::from_str(span).map_err(|e| ExtractionFailure::ParseError(e.to_string()))?;

    let Value::Array(records) = value else {
        return Err(ExtractionFailure::violation(
            "song_suggestions",
            "must be an array of songs",
        ));
    };
    if records.is_empty() {
        return Err(ExtractionFailure::violation(
            "song_suggestions",
            "must contain at least one song",
        ));
    }

    let mut songs = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();
    for (index, record) in records.into_iter().enumerate() {
        match validate_record(record) {
            Ok(song) => songs.push(song),
            Err((field, reason)) => {
                debug!(index, field = %field, reason = %reason, "Rejected song record");
                rejected.push(RejectedSong {
                    index,
                    field,
                    reason,
                });
            }
        }
    }

    if songs.is_empty() {
        let (field, reason) = rejected
            .first()
            .map(|r| (r.field.clone(), format!("{} (no valid song left)", r.reason)))
            .unwrap_or_else(|| ("song_suggestions".to_string(), "has no valid song".to_string()));
        return Err(ExtractionFailure::SchemaViolation { field, reason });
    }

    Ok(ValidatedSongs { songs, rejected })
}

type FieldError = (String, String);

fn field_error(field: &str, reason: &str) -> FieldError {
    (field.to_string(), reason.to_string())
}

fn validate_record(record: Value) -> Result<SongSuggestion, FieldError> {
    let Value::Object(object) = record else {
        return Err(field_error("(record)", "must be an object"));
    };

    let song_name = required_string(&object, "songName")?;
    let artist = required_string(&object, "artist")?;
    let description = required_string(&object, "description")?;

    let difficulty_raw = required_string(&object, "difficulty")?;
    let difficulty = Difficulty::parse(&difficulty_raw).ok_or_else(|| {
        field_error(
            "difficulty",
            "must be one of Beginner, Intermediate, Advanced",
        )
    })?;

    let key = match object.get("key") {
        None | Some(Value::Null) => None,
        Some(Value::String(key)) => Some(key.trim().to_string()).filter(|k| !k.is_empty()),
        Some(_) => return Err(field_error("key", "must be a string")),
    };

    let chord_progression = match object.get("chordProgression") {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => {
            let mut chords = Vec::with_capacity(items.len());
            for item in items {
                match item.as_str().map(str::trim) {
                    Some("") => {}
                    Some(chord) => chords.push(chord.to_string()),
                    None => {
                        return Err(field_error(
                            "chordProgression",
                            "must contain only strings",
                        ))
                    }
                }
            }
            Some(chords).filter(|c| !c.is_empty())
        }
        Some(_) => return Err(field_error("chordProgression", "must be an array")),
    };

    // Media fields sent by the model are dropped: only enrichment sets them.
    let mut song = SongSuggestion::new(song_name, artist, description, difficulty);
    song.key = key;
    song.chord_progression = chord_progression;
    Ok(song)
}

fn required_string(object: &Map<String, Value>, field: &str) -> Result<String, FieldError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(field_error(field, "is required")),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(field_error(field, "must not be empty"))
        }
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(field_error(field, "must be a string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn song_json(difficulty: &str) -> Value {
        json!({
            "songName": "Let It Be",
            "artist": "The Beatles",
            "description": "Classic I-V-vi-IV",
            "difficulty": difficulty,
        })
    }

    fn validate(value: Value) -> ExtractionOutcome<ValidatedSongs> {
        validate_song_list(&value.to_string())
    }

    #[test]
    fn test_difficulty_is_normalized() {
        for (raw, expected) in [
            ("beginner", Difficulty::Beginner),
            ("INTERMEDIATE", Difficulty::Intermediate),
            (" Advanced ", Difficulty::Advanced),
        ] {
            let result = validate(json!([song_json(raw)])).unwrap();
            assert_eq!(result.songs[0].difficulty, expected);
        }

        let songs = validate(json!([song_json("advanced")])).unwrap().songs;
        let serialized = serde_json::to_value(&songs[0]).unwrap();
        assert_eq!(serialized["difficulty"], "Advanced");
    }

    #[test]
    fn test_single_invalid_difficulty_is_rejected_alone() {
        let result = validate(json!([
            song_json("Beginner"),
            song_json("expert"),
            song_json("Intermediate"),
        ]))
        .unwrap();
        assert_eq!(result.songs.len(), 2);
        assert_eq!(
            result.rejected,
            vec![RejectedSong {
                index: 1,
                field: "difficulty".to_string(),
                reason: "must be one of Beginner, Intermediate, Advanced".to_string(),
            }]
        );
    }

    #[test]
    fn test_all_rejected_is_a_violation() {
        let failure = validate(json!([
            {"songName": "X", "artist": "Y", "description": "Z", "difficulty": "expert"}
        ]))
        .unwrap_err();
        match failure {
            ExtractionFailure::SchemaViolation { field, .. } => assert_eq!(field, "difficulty"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_object_is_not_wrapped() {
        let failure = validate(song_json("Beginner")).unwrap_err();
        assert_eq!(
            failure,
            ExtractionFailure::violation("song_suggestions", "must be an array of songs")
        );
    }

    #[test]
    fn test_empty_array_is_a_violation() {
        assert!(matches!(
            validate(json!([])),
            Err(ExtractionFailure::SchemaViolation { .. })
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            validate_song_list("[{\"songName\": }]"),
            Err(ExtractionFailure::ParseError(_))
        ));
    }

    #[test]
    fn test_required_fields() {
        let cases = [
            (json!({"artist": "A", "description": "D", "difficulty": "Beginner"}), "songName", "is required"),
            (json!({"songName": "S", "description": "D", "difficulty": "Beginner"}), "artist", "is required"),
            (json!({"songName": "S", "artist": 5, "description": "D", "difficulty": "Beginner"}), "artist", "must be a string"),
            (json!({"songName": "S", "artist": "A", "description": " ", "difficulty": "Beginner"}), "description", "must not be empty"),
            (json!({"songName": "S", "artist": "A", "description": "D"}), "difficulty", "is required"),
            (json!("just a string"), "(record)", "must be an object"),
        ];
        for (record, field, reason) in cases {
            let result = validate(json!([song_json("Beginner"), record])).unwrap();
            assert_eq!(result.songs.len(), 1);
            assert_eq!(result.rejected[0].field, field);
            assert_eq!(result.rejected[0].reason, reason);
        }
    }

    #[test]
    fn test_optional_fields() {
        let result = validate(json!([
            {
                "songName": "Wonderwall", "artist": "Oasis", "description": "Capo 2",
                "difficulty": "Intermediate", "key": " F# Minor ",
                "chordProgression": ["Em7", " G ", "", "Dsus4", "A7sus4"]
            },
            {
                "songName": "Horse", "artist": "America", "description": "Two chords",
                "difficulty": "Beginner", "key": "", "chordProgression": []
            }
        ]))
        .unwrap();

        let first = &result.songs[0];
        assert_eq!(first.key.as_deref(), Some("F# Minor"));
        assert_eq!(
            first.chord_progression,
            Some(vec![
                "Em7".to_string(),
                "G".to_string(),
                "Dsus4".to_string(),
                "A7sus4".to_string()
            ])
        );

        let second = &result.songs[1];
        assert_eq!(second.key, None);
        assert_eq!(second.chord_progression, None);
    }

    #[test]
    fn test_wrong_optional_types_reject_record() {
        let mut bad_key = song_json("Beginner");
        bad_key["key"] = json!(7);
        let mut bad_progression = song_json("Beginner");
        bad_progression["chordProgression"] = json!("C G Am F");
        let mut bad_chord = song_json("Beginner");
        bad_chord["chordProgression"] = json!(["C", 1]);

        let result = validate(json!([
            song_json("Beginner"),
            bad_key,
            bad_progression,
            bad_chord
        ]))
        .unwrap();
        let fields: Vec<&str> = result.rejected.iter().map(|r| r.field.as_str()).collect();
        assert_eq!(fields, vec!["key", "chordProgression", "chordProgression"]);
    }

    #[test]
    fn test_model_media_fields_are_ignored() {
        let mut record = song_json("Beginner");
        record["youtubeUrl"] = json!("https://evil.example/watch");
        record["spotifyUrl"] = json!("https://evil.example/track");
        let result = validate(json!([record])).unwrap();
        assert_eq!(result.songs[0].youtube_url, None);
        assert_eq!(result.songs[0].spotify_url, None);
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let mut song = SongSuggestion::new("S", "A", "D", Difficulty::Beginner);
        song.chord_progression = Some(vec!["C".to_string()]);
        song.youtube_url = Some("https://www.youtube.com/watch?v=1".to_string());
        let value = serde_json::to_value(&song).unwrap();
        assert_eq!(
            value,
            json!({
                "songName": "S",
                "artist": "A",
                "description": "D",
                "difficulty": "Beginner",
                "chordProgression": ["C"],
                "youtubeUrl": "https://www.youtube.com/watch?v=1",
            })
        );
    }

    proptest! {
        #[test]
        fn one_bad_difficulty_rejects_only_that_song(
            names in prop::collection::vec("[A-Za-z][A-Za-z ]{0,15}", 2..8),
            bad_index in any::<prop::sample::Index>(),
            bad_difficulty in "[A-Za-z ]{0,12}"
                .prop_filter("must not name a difficulty", |d| Difficulty::parse(d).is_none()),
        ) {
            let bad = bad_index.index(names.len());
            let records: Vec<Value> = names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let difficulty = if i == bad { bad_difficulty.as_str() } else { "Intermediate" };
                    json!({
                        "songName": name,
                        "artist": "Artist",
                        "description": "desc",
                        "difficulty": difficulty,
                    })
                })
                .collect();

            let validated = validate(Value::Array(records)).unwrap();

            let expected: Vec<&str> = names
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != bad)
                .map(|(_, name)| name.trim())
                .collect();
            let kept: Vec<&str> = validated.songs.iter().map(|s| s.song_name.as_str()).collect();
            prop_assert_eq!(kept, expected);
            prop_assert_eq!(validated.rejected.len(), 1);
            prop_assert_eq!(validated.rejected[0].index, bad);
            prop_assert_eq!(validated.rejected[0].field.as_str(), "difficulty");
        }
    }
}
