//! Fake upstream services
//!
//! A single axum server standing in for the model API (OpenAI streaming
//! protocol), the YouTube Data API and the Spotify Web API.

use super::constants::*;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Model answers served by the fake model API, keyed by model role
#[derive(Clone, Debug, Default)]
pub struct ModelScripts {
    /// Answer of the chord analysis model
    pub json_answer: String,
    /// Answer of the song suggestion model
    pub chat_answer: String,
}

impl ModelScripts {
    pub fn new(json_answer: &str, chat_answer: &str) -> Self {
        Self {
            json_answer: json_answer.to_string(),
            chat_answer: chat_answer.to_string(),
        }
    }
}

#[derive(Default)]
struct UpstreamState {
    scripts: ModelScripts,
    completions: AtomicUsize,
    video_queries: Mutex<Vec<String>>,
    track_queries: Mutex<Vec<String>>,
    token_requests: AtomicUsize,
}

pub struct FakeUpstream {
    pub base_url: String,
    state: Arc<UpstreamState>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

/// Split `text` into small chunks framed as OpenAI stream events.
fn sse_body(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut body = String::new();
    for piece in chars.chunks(8) {
        let piece: String = piece.iter().collect();
        let event = json!({"choices": [{"index": 0, "delta": {"content": piece}}]});
        body.push_str(&format!("data: {}\n\n", event));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn has_authorization(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected)
}

async fn chat_completions(
    State(state): State<Arc<UpstreamState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !has_authorization(&headers, &format!("Bearer {}", LLM_API_KEY)) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    state.completions.fetch_add(1, Ordering::SeqCst);

    let answer = match body["model"].as_str() {
        Some(JSON_MODEL) => &state.scripts.json_answer,
        Some(CHAT_MODEL) => &state.scripts.chat_answer,
        _ => return (StatusCode::NOT_FOUND, "unknown model").into_response(),
    };
    if body["stream"] != json!(true) {
        return (StatusCode::BAD_REQUEST, "only streaming is supported").into_response();
    }

    (
        [(header::CONTENT_TYPE, "text/event-stream")],
        sse_body(answer),
    )
        .into_response()
}

async fn list_models() -> Json<Value> {
    Json(json!({"object": "list", "data": [{"id": CHAT_MODEL}, {"id": JSON_MODEL}]}))
}

async fn youtube_search(
    State(state): State<Arc<UpstreamState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if params.get("key").map(String::as_str) != Some(YOUTUBE_API_KEY) {
        return StatusCode::FORBIDDEN.into_response();
    }
    let query = params.get("q").cloned().unwrap_or_default();
    state.video_queries.lock().unwrap().push(query.clone());

    if query.contains(SLOW_VIDEO_MARKER) {
        tokio::time::sleep(Duration::from_millis(SLOW_VIDEO_DELAY_MS)).await;
    }
    if query.contains(NO_MATCH_MARKER) {
        return Json(json!({"items": []})).into_response();
    }

    Json(json!({
        "items": [{
            "id": {"kind": "youtube#video", "videoId": "dQw4w9WgXcQ"},
            "snippet": {
                "title": query,
                "thumbnails": {
                    "default": {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg"},
                    "medium": {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/mqdefault.jpg"}
                }
            }
        }]
    }))
    .into_response()
}

async fn spotify_token(State(state): State<Arc<UpstreamState>>, headers: HeaderMap) -> Response {
    let expected = format!(
        "Basic {}",
        BASE64.encode(format!("{}:{}", SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET))
    );
    if !has_authorization(&headers, &expected) {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_client"}))).into_response();
    }
    state.token_requests.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "access_token": SPOTIFY_ACCESS_TOKEN,
        "token_type": "Bearer",
        "expires_in": 3600
    }))
    .into_response()
}

async fn spotify_search(
    State(state): State<Arc<UpstreamState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let expected = format!("Bearer {}", SPOTIFY_ACCESS_TOKEN);
    if !has_authorization(&headers, &expected) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let query = params.get("q").cloned().unwrap_or_default();
    state.track_queries.lock().unwrap().push(query.clone());

    if query.contains(NO_MATCH_MARKER) {
        return Json(json!({"tracks": {"items": []}})).into_response();
    }

    Json(json!({
        "tracks": {"items": [{
            "id": "7iN1s7xHE4ifF5povM6A48",
            "name": query,
            "external_urls": {"spotify": "https://open.spotify.com/track/7iN1s7xHE4ifF5povM6A48"},
            "album": {
                "name": "Fake Album",
                "images": [{"url": "https://i.scdn.co/image/640", "height": 640, "width": 640}]
            },
            "artists": [{"name": "Fake Artist"}]
        }]}
    }))
    .into_response()
}

impl FakeUpstream {
    pub async fn spawn(scripts: ModelScripts) -> Self {
        let state = Arc::new(UpstreamState {
            scripts,
            ..Default::default()
        });

        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .route("/v1/models", get(list_models))
            .route("/youtube/search", get(youtube_search))
            .route("/spotify/accounts/api/token", post(spotify_token))
            .route("/spotify/api/search", get(spotify_search))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake upstream");
        let port = listener.local_addr().expect("No local address").port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Fake upstream failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Number of chat completion requests received
    pub fn completions(&self) -> usize {
        self.state.completions.load(Ordering::SeqCst)
    }

    pub fn video_queries(&self) -> Vec<String> {
        self.state.video_queries.lock().unwrap().clone()
    }

    pub fn track_queries(&self) -> Vec<String> {
        self.state.track_queries.lock().unwrap().clone()
    }

    pub fn token_requests(&self) -> usize {
        self.state.token_requests.load(Ordering::SeqCst)
    }
}
