//! Spotify Web API client using the client-credentials flow.

use super::{LookupError, TrackMatch, TrackSearch};
use crate::config::SpotifySettings;
use anyhow::Result;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

const SERVICE: &str = "spotify";
const SEARCH_LIMIT: u32 = 5;
/// Tokens are refreshed this long before Spotify expires them.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

pub struct SpotifyClient {
    client: Client,
    accounts_url: String,
    api_url: String,
    market: String,
    basic_auth: String,
    token: Mutex<Option<CachedToken>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Deserialize)]
struct SearchResponse {
    tracks: Option<TrackPage>,
}

#[derive(Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<Track>,
}

#[derive(Deserialize)]
struct Track {
    id: String,
    name: String,
    external_urls: ExternalUrls,
    album: Album,
    #[serde(default)]
    artists: Vec<Artist>,
}

#[derive(Deserialize)]
struct ExternalUrls {
    spotify: String,
}

#[derive(Deserialize)]
struct Album {
    name: String,
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Deserialize)]
struct Image {
    url: String,
}

#[derive(Deserialize)]
struct Artist {
    name: String,
}

impl From<Track> for TrackMatch {
    fn from(track: Track) -> Self {
        TrackMatch {
            url: track.external_urls.spotify,
            thumbnail: track.album.images.into_iter().next().map(|i| i.url),
            track_name: track.name,
            artist_name: track
                .artists
                .into_iter()
                .next()
                .map(|a| a.name)
                .unwrap_or_else(|| "Unknown Artist".to_string()),
            album_name: track.album.name,
            spotify_id: track.id,
        }
    }
}

impl SpotifyClient {
    pub fn new(settings: &SpotifySettings, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            accounts_url: settings.accounts_url.trim_end_matches('/').to_string(),
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            market: settings.market.clone(),
            basic_auth: BASE64.encode(format!(
                "{}:{}",
                settings.client_id, settings.client_secret
            )),
            token: Mutex::new(None),
        })
    }

    /// Current access token, requesting a new one when missing or expiring.
    async fn access_token(&self) -> Result<String, LookupError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.access_token.clone());
            }
        }

        debug!("Requesting Spotify access token");
        let response = self
            .client
            .post(format!("{}/api/token", self.accounts_url))
            .header("Authorization", format!("Basic {}", self.basic_auth))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(|e| LookupError::from_reqwest(SERVICE, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Failed to get Spotify token");
            return Err(LookupError::Auth {
                service: SERVICE,
                message: format!("token endpoint answered {}", status),
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| LookupError::Auth {
            service: SERVICE,
            message: e.to_string(),
        })?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    async fn forget_token(&self) {
        *self.token.lock().await = None;
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}&type=track&limit={}&market={}",
            self.api_url,
            urlencoding::encode(query),
            SEARCH_LIMIT,
            urlencoding::encode(&self.market)
        )
    }
}

#[async_trait]
impl TrackSearch for SpotifyClient {
    async fn search_track(&self, query: &str) -> Result<Option<TrackMatch>, LookupError> {
        let token = self.access_token().await?;

        debug!(query, "Searching Spotify");
        let response = self
            .client
            .get(self.search_url(query))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| LookupError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // Revoked before its advertised expiry, fetch a new one next time.
            self.forget_token().await;
        }
        if !status.is_success() {
            return Err(LookupError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| LookupError::from_reqwest(SERVICE, e))?;

        Ok(body
            .tracks
            .and_then(|page| page.items.into_iter().next())
            .map(TrackMatch::from))
    }
}
