//! Prompts sent to the models.

pub const JSON_RESPONSE_PROMPT: &str = r#"
You are a JSON response assistant. You MUST respond with valid JSON only, no additional text or explanations.

CRITICAL RULES:
1. ALWAYS return valid JSON format
2. NO markdown formatting, no backticks
3. NO explanations before or after the JSON
4. NO additional text outside the JSON
5. NO reasoning or thinking process
6. NO "Here's the answer:" or similar phrases
7. Ensure the JSON is properly formatted and parseable
8. Use the exact property names requested by the user
9. Keep responses concise and focused
10. ONLY output the JSON object, nothing else

Example of correct response:
{"complementary_note": "C"}

Examples of INCORRECT responses:
- Here's the answer: {"complementary_note": "C"}
- {"complementary_note": "C"} - this is the complementary note
- Let me think about this... {"complementary_note": "C"}

The user will specify the exact JSON schema they want. Follow it precisely and output ONLY the JSON.
"#;

pub const SONG_SUGGESTIONS_SYSTEM_PROMPT: &str = r#"You are a music expert who suggests songs based on chord progressions.

Given the selected chords and complementary chords, suggest 5-8 popular songs that feature similar chord progressions or could work well with these chords.

IMPORTANT: You must respond with valid JSON only. Do not include any other text, explanations, or markdown formatting.

Return an array of song objects with this exact structure:
[
  {
    "songName": "Song Title",
    "artist": "Artist Name",
    "description": "Brief description of how the chords relate to the song and why it's good for practice",
    "difficulty": "Beginner",
    "key": "C Major",
    "chordProgression": ["C", "G", "Am", "F"]
  }
]

The difficulty must be exactly one of: "Beginner", "Intermediate", or "Advanced".

Focus on well-known songs that guitarists would recognize. Make sure the suggestions are practical and achievable for the given chord complexity."#;

/// Where the request came from, appended to the system prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestHints {
    pub latitude: String,
    pub longitude: String,
    pub city: String,
    pub country: String,
}

impl Default for RequestHints {
    fn default() -> Self {
        Self {
            latitude: "0".to_string(),
            longitude: "0".to_string(),
            city: String::new(),
            country: String::new(),
        }
    }
}

impl RequestHints {
    fn to_prompt(&self) -> String {
        format!(
            "About the origin of user's request:\n- lat: {}\n- lon: {}\n- city: {}\n- country: {}\n",
            self.latitude, self.longitude, self.city, self.country
        )
    }
}

/// System prompt of the JSON-only model.
pub fn json_system_prompt(hints: &RequestHints) -> String {
    format!("{}\n\n{}", JSON_RESPONSE_PROMPT, hints.to_prompt())
}

pub fn complementary_chords_prompt(selected: &[String]) -> String {
    format!(
        r#"Given the selected chords: {}, provide:
1. Complementary chords that would work well in a progression
2. A musical analysis of the chord progression

Return the answer in this exact JSON format:
{{
  "complementary_chords": ["chord1", "chord2", "chord3"],
  "analysis": {{
    "progression_type": "description of the progression type",
    "musical_characteristics": "key musical features and mood",
    "common_uses": "typical genres or contexts where this progression is used",
    "suggestions": "musical suggestions for using this progression"
  }}
}}"#,
        selected.join(", ")
    )
}

pub fn song_suggestions_prompt(selected: &[String], complementary: Option<&[String]>) -> String {
    let complementary = match complementary {
        Some(chords) if !chords.is_empty() => chords.join(", "),
        _ => "None".to_string(),
    };
    format!(
        "Selected Chords: {}\nComplementary Chords: {}\n\nPlease suggest songs that would work well with these chord progressions. Respond with JSON only.",
        selected.join(", "),
        complementary
    )
}
