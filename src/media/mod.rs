//! Video and track lookups used to enrich song suggestions.

mod enrichment;
mod spotify;
mod youtube;

pub use enrichment::{EnrichmentDispatcher, EnrichmentReport};
pub use spotify::SpotifyClient;
pub use youtube::YouTubeClient;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Top video match for a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMatch {
    pub video_id: String,
    pub title: String,
    pub thumbnail: String,
    pub url: String,
}

/// Top track match for a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackMatch {
    pub url: String,
    pub thumbnail: Option<String>,
    pub track_name: String,
    pub artist_name: String,
    pub album_name: String,
    pub spotify_id: String,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{service} request failed: {message}")]
    Http {
        service: &'static str,
        message: String,
    },

    #[error("{service} answered with status {status}")]
    Status { service: &'static str, status: u16 },

    #[error("{service} found no match")]
    NotFound { service: &'static str },

    #[error("{service} authentication failed: {message}")]
    Auth {
        service: &'static str,
        message: String,
    },

    #[error("{service} lookup timed out")]
    Timeout { service: &'static str },

    #[error("{service} returned an unexpected payload: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    #[error("{service} is not configured")]
    NotConfigured { service: &'static str },
}

impl LookupError {
    pub(crate) fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { service }
        } else if err.is_decode() {
            Self::Decode {
                service,
                message: err.to_string(),
            }
        } else {
            Self::Http {
                service,
                message: err.to_string(),
            }
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http { .. } => "http",
            Self::Status { .. } => "status",
            Self::NotFound { .. } => "not_found",
            Self::Auth { .. } => "auth",
            Self::Timeout { .. } => "timeout",
            Self::Decode { .. } => "decode",
            Self::NotConfigured { .. } => "not_configured",
        }
    }
}

/// Video search service returning the single best match.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search_video(&self, query: &str) -> Result<VideoMatch, LookupError>;
}

/// Track search service. `Ok(None)` means the search succeeded without a match.
#[async_trait]
pub trait TrackSearch: Send + Sync {
    async fn search_track(&self, query: &str) -> Result<Option<TrackMatch>, LookupError>;
}
