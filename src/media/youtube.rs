//! YouTube Data API v3 search client.

use super::{LookupError, VideoMatch, VideoSearch};
use crate::config::YouTubeSettings;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const SERVICE: &str = "youtube";
const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct Snippet {
    title: String,
    thumbnails: Thumbnails,
}

#[derive(Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Deserialize)]
struct Thumbnail {
    url: String,
}

impl YouTubeClient {
    pub fn new(settings: &YouTubeSettings, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?part=snippet&q={}&type=video&maxResults=1&videoDuration=medium&relevanceLanguage=en&key={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn search_video(&self, query: &str) -> Result<VideoMatch, LookupError> {
        debug!(query, "Searching YouTube");

        let response = self
            .client
            .get(self.search_url(query))
            .send()
            .await
            .map_err(|e| LookupError::from_reqwest(SERVICE, e))?;

        if !response.status().is_success() {
            return Err(LookupError::Status {
                service: SERVICE,
                status: response.status().as_u16(),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| LookupError::from_reqwest(SERVICE, e))?;

        let (video_id, snippet) = body
            .items
            .into_iter()
            .find_map(|item| item.id.video_id.map(|id| (id, item.snippet)))
            .ok_or(LookupError::NotFound { service: SERVICE })?;

        let thumbnail = snippet
            .thumbnails
            .medium
            .or(snippet.thumbnails.default)
            .map(|t| t.url)
            .ok_or_else(|| LookupError::Decode {
                service: SERVICE,
                message: "video has no thumbnail".to_string(),
            })?;

        Ok(VideoMatch {
            url: format!("{}{}", WATCH_URL, video_id),
            video_id,
            title: snippet.title,
            thumbnail,
        })
    }
}
