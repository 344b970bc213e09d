//! Chord analysis and song suggestion endpoints.

use super::error::ApiError;
use super::session::Session;
use super::state::{GuardedRecommendations, ServerState};
use crate::chords::{catalog, find_by_short_name};
use crate::extraction::chord_fallback;
use crate::recommendations::ChordPipelineError;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{debug, error};

const CHORDS_REQUIRED: &str = "Please provide an array of selected chords";
const SELECTED_CHORDS_REQUIRED: &str = "Selected chords are required";
const CHORDS_GENERATED: &str = "Successfully generated complementary chords and analysis";
const INTERNAL_ERROR: &str = "Internal server error";

/// Read a non-empty array of chord names from `body[field]`.
fn chord_list(body: &Value, field: &str) -> Option<Vec<String>> {
    let items = body.get(field)?.as_array()?;
    let chords = items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()?;
    (!chords.is_empty()).then_some(chords)
}

fn request_body(payload: Result<Json<Value>, JsonRejection>) -> Option<Value> {
    match payload {
        Ok(Json(body)) => Some(body),
        Err(rejection) => {
            debug!("Rejected request body: {}", rejection);
            None
        }
    }
}

/// Map a failed chord pipeline to its response.
///
/// Extraction failures carry the chord fallback payload so clients can still
/// render an empty result.
fn chord_failure_response(err: ChordPipelineError) -> Response {
    match err {
        ChordPipelineError::Extraction(failure) => {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(chord_fallback(&failure))).into_response()
        }
        ChordPipelineError::Model(e) => {
            error!("Model call failed while generating chords: {}", e);
            ApiError::internal_with_details(INTERNAL_ERROR, e).into_response()
        }
    }
}

async fn post_complementary_chords(
    _session: Session,
    State(service): State<GuardedRecommendations>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Some(selected) = request_body(payload).and_then(|b| chord_list(&b, "selectedChords"))
    else {
        return ApiError::bad_request(CHORDS_REQUIRED).into_response();
    };

    match service.complementary_chords(&selected).await {
        Ok(result) => Json(json!({
            "complementary_chords": result.complementary_chords,
            "analysis": result.analysis,
            "original_chords": selected,
            "message": CHORDS_GENERATED,
        }))
        .into_response(),
        Err(err) => chord_failure_response(err),
    }
}

async fn post_song_suggestions(
    _session: Session,
    State(service): State<GuardedRecommendations>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Some(body) = request_body(payload) else {
        return ApiError::bad_request(SELECTED_CHORDS_REQUIRED).into_response();
    };
    let Some(selected) = chord_list(&body, "selectedChords") else {
        return ApiError::bad_request(SELECTED_CHORDS_REQUIRED).into_response();
    };
    let complementary = chord_list(&body, "complementaryChords");

    match service
        .song_suggestions(&selected, complementary.as_deref())
        .await
    {
        Ok(suggestions) => Json(json!({
            "song_suggestions": suggestions.songs,
            "selected_chords": selected,
            "complementary_chords": complementary.unwrap_or_default(),
        }))
        .into_response(),
        Err(e) => {
            error!("Model call failed while suggesting songs: {}", e);
            ApiError::internal_with_details(INTERNAL_ERROR, e).into_response()
        }
    }
}

async fn post_recommendations(
    _session: Session,
    State(service): State<GuardedRecommendations>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Some(selected) = request_body(payload).and_then(|b| chord_list(&b, "selectedChords"))
    else {
        return ApiError::bad_request(CHORDS_REQUIRED).into_response();
    };

    match service.recommendations(&selected).await {
        Ok(result) => Json(json!({
            "complementary_chords": result.chords.complementary_chords,
            "analysis": result.chords.analysis,
            "original_chords": selected,
            "song_suggestions": result.songs.songs,
        }))
        .into_response(),
        Err(err) => chord_failure_response(err),
    }
}

async fn get_chords(_session: Session) -> impl IntoResponse {
    Json(catalog())
}

async fn get_chord(_session: Session, Path(short_name): Path<String>) -> Response {
    match find_by_short_name(&short_name) {
        Some(chord) => Json(chord).into_response(),
        None => ApiError::NotFound(format!("Unknown chord: {}", short_name)).into_response(),
    }
}

pub fn recommendation_routes(state: ServerState) -> Router {
    Router::new()
        .route("/complementary-chords", post(post_complementary_chords))
        .route("/song-suggestions", post(post_song_suggestions))
        .route("/recommendations", post(post_recommendations))
        .route("/chords", get(get_chords))
        .route("/chords/{short_name}", get(get_chord))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chord_list_requires_non_empty_string_array() {
        let body = json!({"selectedChords": ["C", "G"]});
        assert_eq!(
            chord_list(&body, "selectedChords"),
            Some(vec!["C".to_string(), "G".to_string()])
        );
        assert_eq!(chord_list(&json!({"selectedChords": []}), "selectedChords"), None);
        assert_eq!(chord_list(&json!({"selectedChords": "C"}), "selectedChords"), None);
        assert_eq!(chord_list(&json!({"selectedChords": ["C", 1]}), "selectedChords"), None);
        assert_eq!(chord_list(&json!({}), "selectedChords"), None);
    }
}
