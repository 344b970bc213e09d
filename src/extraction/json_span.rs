//! Locating the JSON value inside free-form model output.
//!
//! The greedy strategy takes everything from the first opening delimiter to
//! the last closing one. It assumes the model emits a single JSON value and
//! that the surrounding prose contains no stray delimiters: text such as
//! `use {C} {"a":1}` yields a span that does not parse. The balanced strategy
//! walks nesting depth instead, skipping string literals, and yields every
//! balanced span so callers can pick the first one their schema accepts.

use super::ExtractionFailure;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref GREEDY_OBJECT: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
    static ref GREEDY_ARRAY: Regex = Regex::new(r"(?s)\[.*\]").unwrap();
}

/// How the JSON span is located in the accumulated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonSpanStrategy {
    #[default]
    Greedy,
    Balanced,
}

impl JsonSpanStrategy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "greedy" => Some(Self::Greedy),
            "balanced" => Some(Self::Balanced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Balanced => "balanced",
        }
    }
}

/// Which kinds of top-level values a schema accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiters {
    /// Objects only.
    Braces,
    /// Objects or arrays, whichever opens first.
    BracesOrBrackets,
}

/// The greedy first-`{`-to-last-`}` span.
pub fn extract_json_span(text: &str) -> Result<&str, ExtractionFailure> {
    locate_json_span(text, JsonSpanStrategy::Greedy, Delimiters::Braces)
}

pub fn locate_json_span(
    text: &str,
    strategy: JsonSpanStrategy,
    delimiters: Delimiters,
) -> Result<&str, ExtractionFailure> {
    let span = match strategy {
        JsonSpanStrategy::Greedy => greedy_span(text, delimiters),
        JsonSpanStrategy::Balanced => balanced_span(text, delimiters),
    };
    span.ok_or(ExtractionFailure::NoJsonFound)
}

fn greedy_span(text: &str, delimiters: Delimiters) -> Option<&str> {
    let object = GREEDY_OBJECT.find(text);
    let array = match delimiters {
        Delimiters::Braces => None,
        Delimiters::BracesOrBrackets => GREEDY_ARRAY.find(text),
    };

    let chosen = match (object, array) {
        (Some(o), Some(a)) => {
            if a.start() < o.start() {
                a
            } else {
                o
            }
        }
        (Some(o), None) => o,
        (None, Some(a)) => a,
        (None, None) => return None,
    };
    Some(chosen.as_str())
}

fn is_opener(byte: u8, delimiters: Delimiters) -> bool {
    match delimiters {
        Delimiters::Braces => byte == b'{',
        Delimiters::BracesOrBrackets => byte == b'{' || byte == b'[',
    }
}

fn balanced_span(text: &str, delimiters: Delimiters) -> Option<&str> {
    let candidates = balanced_candidates(text, delimiters);
    candidates
        .iter()
        .find(|c| serde_json::from_str::<serde_json::Value>(c).is_ok())
        .or(candidates.first())
        .copied()
}

/// Every span whose delimiters nest consistently, ordered by start.
///
/// One pass over the text with a stack of open positions. String literals
/// are only tracked inside an open span, so quotes in surrounding prose do
/// not hide the payload. A mismatched closer invalidates every span still
/// open.
fn balanced_candidates(text: &str, delimiters: Delimiters) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut open: Vec<(usize, u8)> = Vec::new();
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (index, &byte) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' if !open.is_empty() => in_string = true,
            b'{' | b'[' if !open.is_empty() || is_opener(byte, delimiters) => {
                let close = if byte == b'{' { b'}' } else { b']' };
                open.push((index, close));
            }
            b'}' | b']' => match open.pop() {
                Some((start, close)) if close == byte => {
                    if is_opener(bytes[start], delimiters) {
                        spans.push((start, index));
                    }
                }
                Some(_) => open.clear(),
                None => {}
            },
            _ => {}
        }
    }

    spans.sort_unstable_by_key(|(start, _)| *start);
    // Delimiters are ASCII, so both ends fall on char boundaries.
    spans
        .into_iter()
        .map(|(start, end)| &text[start..=end])
        .collect()
}

/// Locate the JSON value in `text` and run `validate` on it.
///
/// With the balanced strategy every candidate span is tried in order and
/// the first one `validate` accepts wins. When none does, the failure of
/// the first candidate is returned.
pub fn extract_validated<T>(
    text: &str,
    strategy: JsonSpanStrategy,
    delimiters: Delimiters,
    validate: impl Fn(&str) -> Result<T, ExtractionFailure>,
) -> Result<T, ExtractionFailure> {
    match strategy {
        JsonSpanStrategy::Greedy => {
            let span = greedy_span(text, delimiters).ok_or(ExtractionFailure::NoJsonFound)?;
            validate(span)
        }
        JsonSpanStrategy::Balanced => {
            let mut first_failure = None;
            for candidate in balanced_candidates(text, delimiters) {
                match validate(candidate) {
                    Ok(value) => return Ok(value),
                    Err(e) => {
                        first_failure.get_or_insert(e);
                    }
                }
            }
            Err(first_failure.unwrap_or(ExtractionFailure::NoJsonFound))
        }
    }
}
