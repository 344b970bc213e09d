use axum::extract::FromRef;

use crate::config::AppConfig;
use crate::llm::{CompletionOptions, ModelRegistry};
use crate::media::{EnrichmentDispatcher, SpotifyClient, TrackSearch, VideoSearch, YouTubeClient};
use crate::recommendations::{RecommendationService, RecommendationSettings};
use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::session::SessionKeys;
use super::ServerConfig;

pub type GuardedRecommendations = Arc<RecommendationService>;
pub type GuardedSessionKeys = Arc<SessionKeys>;
pub type OptionalVideoSearch = Option<Arc<dyn VideoSearch>>;
pub type OptionalTrackSearch = Option<Arc<dyn TrackSearch>>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub hash: String,
    pub recommendations: GuardedRecommendations,
    pub session_keys: GuardedSessionKeys,
    pub video_search: OptionalVideoSearch,
    pub track_search: OptionalTrackSearch,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        recommendations: RecommendationService,
        session_keys: SessionKeys,
        video_search: OptionalVideoSearch,
        track_search: OptionalTrackSearch,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            hash: env!("GIT_HASH").to_owned(),
            recommendations: Arc::new(recommendations),
            session_keys: Arc::new(session_keys),
            video_search,
            track_search,
        }
    }

    /// Build every service the server needs from the resolved configuration,
    /// sharing the process-wide model registry.
    pub fn from_config(
        app_config: &AppConfig,
        models: Arc<ModelRegistry>,
    ) -> Result<ServerState> {
        let lookup_timeout = app_config.enrichment.lookup_timeout();

        let video_search: OptionalVideoSearch = match &app_config.youtube {
            Some(settings) => {
                let client = YouTubeClient::new(settings, lookup_timeout)?;
                Some(Arc::new(client) as Arc<dyn VideoSearch>)
            }
            None => {
                info!("YouTube API key not set, video lookups disabled");
                None
            }
        };
        let track_search: OptionalTrackSearch = match &app_config.spotify {
            Some(settings) => {
                let client = SpotifyClient::new(settings, lookup_timeout)?;
                Some(Arc::new(client) as Arc<dyn TrackSearch>)
            }
            None => {
                info!("Spotify credentials not set, track lookups disabled");
                None
            }
        };

        let enricher = if app_config.enrichment.enabled {
            EnrichmentDispatcher::new(
                video_search.clone(),
                track_search.clone(),
                lookup_timeout,
                app_config.enrichment.video_query_suffix.clone(),
            )
        } else {
            EnrichmentDispatcher::disabled()
        };

        let settings = RecommendationSettings {
            strategy: app_config.extraction.strategy,
            completion: CompletionOptions {
                temperature: app_config.llm.temperature,
                max_tokens: app_config.llm.max_tokens,
                timeout: app_config.llm.timeout(),
            },
            max_logged_chars: app_config.extraction.max_logged_chars,
        };
        let recommendations = RecommendationService::new(
            models,
            Arc::new(enricher),
            settings,
        );

        let config = ServerConfig {
            requests_logging_level: app_config.logging_level.clone(),
            port: app_config.port,
            metrics_port: app_config.metrics_port,
            frontend_dir_path: app_config.frontend_dir_path.clone(),
        };

        Ok(ServerState::new(
            config,
            recommendations,
            SessionKeys::new(&app_config.session_secret),
            video_search,
            track_search,
        ))
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedRecommendations {
    fn from_ref(input: &ServerState) -> Self {
        input.recommendations.clone()
    }
}

impl FromRef<ServerState> for GuardedSessionKeys {
    fn from_ref(input: &ServerState) -> Self {
        input.session_keys.clone()
    }
}

impl FromRef<ServerState> for OptionalVideoSearch {
    fn from_ref(input: &ServerState) -> Self {
        input.video_search.clone()
    }
}

impl FromRef<ServerState> for OptionalTrackSearch {
    fn from_ref(input: &ServerState) -> Self {
        input.track_search.clone()
    }
}
