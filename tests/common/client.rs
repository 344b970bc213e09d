//! HTTP client for end-to-end tests
//!
//! This module wraps reqwest and provides methods for all server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use chordscout_server::server::{SessionKeys, UserType};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    fn build(base_url: String, headers: HeaderMap) -> Self {
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// Creates a client without a session
    pub fn new(base_url: String) -> Self {
        Self::build(base_url, HeaderMap::new())
    }

    /// Creates a client carrying a valid session cookie
    ///
    /// This is the most common way to create a test client.
    pub fn authenticated(base_url: String) -> Self {
        let token = SessionKeys::new(TEST_SESSION_SECRET)
            .mint(TEST_USER_ID, UserType::Regular, Duration::from_secs(600))
            .expect("Failed to mint session token");

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("session_token={}", token))
                .expect("Invalid cookie header"),
        );
        Self::build(base_url, headers)
    }

    async fn post_json(&self, path: &str, body: Value) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Recommendation Endpoints
    // ========================================================================

    pub async fn complementary_chords(&self, body: Value) -> Response {
        self.post_json("/api/complementary-chords", body).await
    }

    pub async fn song_suggestions(&self, body: Value) -> Response {
        self.post_json("/api/song-suggestions", body).await
    }

    pub async fn recommendations(&self, selected: &[&str]) -> Response {
        self.post_json("/api/recommendations", json!({ "selectedChords": selected }))
            .await
    }

    pub async fn get_chords(&self) -> Response {
        self.client
            .get(format!("{}/api/chords", self.base_url))
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Media Endpoints
    // ========================================================================

    pub async fn youtube_search(&self, body: Value) -> Response {
        self.post_json("/api/youtube-search", body).await
    }

    pub async fn spotify_search(&self, body: Value) -> Response {
        self.post_json("/api/spotify-search", body).await
    }

    // ========================================================================
    // Stats
    // ========================================================================

    pub async fn home(&self) -> Response {
        self.client
            .get(&self.base_url)
            .send()
            .await
            .expect("Request failed")
    }
}
