use super::{ExtractionFailure, ExtractionOutcome};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const CHORDS_FIELD: &str = "complementary_chords";
const ANALYSIS_FIELD: &str = "analysis";

/// Free-text analysis of a chord progression, as requested from the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionAnalysis {
    pub progression_type: String,
    pub musical_characteristics: String,
    pub common_uses: String,
    pub suggestions: String,
}

impl ProgressionAnalysis {
    /// Analysis used when the model did not provide one.
    pub fn fallback() -> Self {
        Self {
            progression_type: "Standard progression".to_string(),
            musical_characteristics: "Versatile and commonly used".to_string(),
            common_uses: "Pop, rock, and folk music".to_string(),
            suggestions: "Try playing with different rhythms and strumming patterns".to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "progression_type": self.progression_type,
            "musical_characteristics": self.musical_characteristics,
            "common_uses": self.common_uses,
            "suggestions": self.suggestions,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplementaryChords {
    pub complementary_chords: Vec<String>,
    /// The model's analysis as sent, or the fallback analysis.
    pub analysis: Value,
    pub analysis_defaulted: bool,
}

/// Parse and validate a chord analysis object.
///
/// `complementary_chords` must be a non-empty array of chord names. The
/// `analysis` value is kept verbatim; when absent or null the fallback
/// analysis takes its place.
pub fn validate_chord_analysis(span: &str) -> ExtractionOutcome<ComplementaryChords> {
    let value: Value =
        serde_json::from_str(span).map_err(|e| ExtractionFailure::ParseError(e.to_string()))?;

    let Value::Object(mut object) = value else {
        return Err(ExtractionFailure::violation(
            "(root)",
            "must be a JSON object",
        ));
    };

    let chords = match object.remove(CHORDS_FIELD) {
        None | Some(Value::Null) => {
            return Err(ExtractionFailure::violation(CHORDS_FIELD, "is required"))
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ExtractionFailure::violation(
                CHORDS_FIELD,
                "must be an array",
            ))
        }
    };

    let mut complementary_chords = Vec::with_capacity(chords.len());
    for (index, item) in chords.into_iter().enumerate() {
        match item {
            Value::String(name) => {
                let name = name.trim();
                if !name.is_empty() {
                    complementary_chords.push(name.to_string());
                }
            }
            _ => {
                return Err(ExtractionFailure::violation(
                    format!("{}[{}]", CHORDS_FIELD, index),
                    "must be a string",
                ))
            }
        }
    }
    if complementary_chords.is_empty() {
        return Err(ExtractionFailure::violation(
            CHORDS_FIELD,
            "must contain at least one chord",
        ));
    }

    let (analysis, analysis_defaulted) = match object.remove(ANALYSIS_FIELD) {
        None | Some(Value::Null) => (ProgressionAnalysis::fallback().to_json(), true),
        Some(analysis) => (analysis, false),
    };

    Ok(ComplementaryChords {
        complementary_chords,
        analysis,
        analysis_defaulted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::FailureKind;
    use proptest::prelude::*;

    #[test]
    fn test_missing_analysis_gets_fallback() {
        let result = validate_chord_analysis(r#"{"complementary_chords":["Dm","Em"]}"#).unwrap();
        assert_eq!(result.complementary_chords, vec!["Dm", "Em"]);
        assert!(result.analysis_defaulted);
        assert_eq!(
            result.analysis,
            json!({
                "progression_type": "Standard progression",
                "musical_characteristics": "Versatile and commonly used",
                "common_uses": "Pop, rock, and folk music",
                "suggestions": "Try playing with different rhythms and strumming patterns",
            })
        );
    }

    #[test]
    fn test_null_analysis_gets_fallback() {
        let result =
            validate_chord_analysis(r#"{"complementary_chords":["G"],"analysis":null}"#).unwrap();
        assert!(result.analysis_defaulted);
    }

    #[test]
    fn test_analysis_passed_through_verbatim() {
        let span = r#"{
            "complementary_chords": ["Dm", "G7"],
            "analysis": {"progression_type": "ii-V", "mood": "jazzy", "extra": [1, 2]}
        }"#;
        let result = validate_chord_analysis(span).unwrap();
        assert!(!result.analysis_defaulted);
        assert_eq!(
            result.analysis,
            json!({"progression_type": "ii-V", "mood": "jazzy", "extra": [1, 2]})
        );
    }

    #[test]
    fn test_fallback_round_trips_through_struct() {
        let parsed: ProgressionAnalysis =
            serde_json::from_value(ProgressionAnalysis::fallback().to_json()).unwrap();
        assert_eq!(parsed, ProgressionAnalysis::fallback());
    }

    #[test]
    fn test_chord_names_are_trimmed() {
        let result =
            validate_chord_analysis(r#"{"complementary_chords":[" Dm ","","Em"]}"#).unwrap();
        assert_eq!(result.complementary_chords, vec!["Dm", "Em"]);
    }

    #[test]
    fn test_parse_error() {
        let failure = validate_chord_analysis(r#"{"complementary_chords":["Dm",]}"#).unwrap_err();
        assert_eq!(failure.kind(), FailureKind::ParseError);
    }

    #[test]
    fn test_schema_violations_name_the_field() {
        let cases = [
            (r#"{"analysis":{}}"#, "complementary_chords", "is required"),
            (r#"{"complementary_chords":null}"#, "complementary_chords", "is required"),
            (r#"{"complementary_chords":"Dm, Em"}"#, "complementary_chords", "must be an array"),
            (r#"{"complementary_chords":["Dm",7]}"#, "complementary_chords[1]", "must be a string"),
            (r#"{"complementary_chords":[]}"#, "complementary_chords", "must contain at least one chord"),
            (r#"["Dm"]"#, "(root)", "must be a JSON object"),
        ];
        for (span, expected_field, expected_reason) in cases {
            match validate_chord_analysis(span) {
                Err(ExtractionFailure::SchemaViolation { field, reason }) => {
                    assert_eq!(field, expected_field, "{}", span);
                    assert_eq!(reason, expected_reason, "{}", span);
                }
                other => panic!("expected SchemaViolation for {}, got {:?}", span, other),
            }
        }
    }

    proptest! {
        #[test]
        fn missing_analysis_is_replaced_by_the_fallback(
            chords in prop::collection::vec("[A-G][#b]?(m|7|maj7)?", 1..6),
            extra_key in "[a-z_]{1,12}",
        ) {
            prop_assume!(extra_key != ANALYSIS_FIELD && extra_key != CHORDS_FIELD);
            let mut object = serde_json::Map::new();
            object.insert(CHORDS_FIELD.to_string(), json!(chords));
            object.insert(extra_key, json!("ignored"));

            let result = validate_chord_analysis(&Value::Object(object).to_string()).unwrap();

            prop_assert_eq!(result.complementary_chords, chords);
            prop_assert_eq!(result.analysis, ProgressionAnalysis::fallback().to_json());
            prop_assert!(result.analysis_defaulted);
        }
    }
}
