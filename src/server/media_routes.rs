//! Direct video and track search endpoints.

use super::error::ApiError;
use super::metrics;
use super::session::Session;
use super::state::{OptionalTrackSearch, OptionalVideoSearch, ServerState};
use crate::media::LookupError;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{error, info};

fn query_of(payload: Result<Json<Value>, JsonRejection>) -> Option<String> {
    let Json(body) = payload.ok()?;
    let query = body.get("query")?.as_str()?.trim();
    (!query.is_empty()).then(|| query.to_string())
}

async fn post_youtube_search(
    _session: Session,
    State(video): State<OptionalVideoSearch>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Some(query) = query_of(payload) else {
        return ApiError::bad_request("Query parameter is required").into_response();
    };
    let Some(video) = video else {
        error!("YouTube search requested but no API key is configured");
        return ApiError::internal("YouTube API key not configured").into_response();
    };

    match video.search_video(&query).await {
        Ok(found) => {
            metrics::record_media_lookup("youtube", "ok");
            Json(found).into_response()
        }
        Err(LookupError::NotFound { .. }) => {
            metrics::record_media_lookup("youtube", "not_found");
            ApiError::NotFound("No videos found".to_string()).into_response()
        }
        Err(e) => {
            metrics::record_media_lookup("youtube", e.kind());
            error!(query = %query, error = %e, "YouTube search failed");
            ApiError::internal_with_details("Failed to search YouTube", e).into_response()
        }
    }
}

async fn post_spotify_search(
    _session: Session,
    State(tracks): State<OptionalTrackSearch>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Some(query) = query_of(payload) else {
        return ApiError::bad_request("Search query is required").into_response();
    };
    let Some(tracks) = tracks else {
        error!("Spotify search requested but no credentials are configured");
        return ApiError::internal("Spotify credentials not configured").into_response();
    };

    match tracks.search_track(&query).await {
        Ok(Some(found)) => {
            metrics::record_media_lookup("spotify", "ok");
            Json(found).into_response()
        }
        Ok(None) => {
            metrics::record_media_lookup("spotify", "not_found");
            info!(query = %query, "No tracks found on Spotify");
            Json(json!({
                "url": null,
                "thumbnail": null,
                "message": "No tracks found on Spotify",
            }))
            .into_response()
        }
        Err(e @ LookupError::Auth { .. }) => {
            metrics::record_media_lookup("spotify", e.kind());
            error!(error = %e, "Spotify authentication failed");
            ApiError::internal_with_details("Failed to authenticate with Spotify", e)
                .into_response()
        }
        Err(e) => {
            metrics::record_media_lookup("spotify", e.kind());
            error!(query = %query, error = %e, "Spotify search failed");
            ApiError::internal_with_details("Spotify search failed", e).into_response()
        }
    }
}

pub fn media_routes(state: ServerState) -> Router {
    Router::new()
        .route("/youtube-search", post(post_youtube_search))
        .route("/spotify-search", post(post_spotify_search))
        .with_state(state)
}
