mod file_config;

pub use file_config::{
    EnrichmentConfig, ExtractionConfig, FileConfig, LlmConfig, SpotifyConfig, YouTubeConfig,
};

use crate::extraction::JsonSpanStrategy;
use crate::server::RequestsLoggingLevel;
use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use std::time::Duration;

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.x.ai/v1";
pub const DEFAULT_CHAT_MODEL: &str = "grok-2-vision-1212";
pub const DEFAULT_JSON_MODEL: &str = "grok-3-mini-beta";
pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub session_secret: Option<String>,
    pub llm_base_url: Option<String>,
    pub llm_api_key: Option<String>,
    pub youtube_api_key: Option<String>,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub session_secret: String,

    // Feature configs (with defaults)
    pub llm: LlmSettings,
    pub extraction: ExtractionSettings,
    pub enrichment: EnrichmentSettings,

    // Media services, only present when credentials are configured
    pub youtube: Option<YouTubeSettings>,
    pub spotify: Option<SpotifySettings>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let session_secret = file
            .session_secret
            .or_else(|| cli.session_secret.clone())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                anyhow!("session_secret must be specified via --session-secret or in config file")
            })?;

        let llm_file = file.llm.unwrap_or_default();
        let defaults = LlmSettings::default();
        let llm = LlmSettings {
            base_url: llm_file
                .base_url
                .or_else(|| cli.llm_base_url.clone())
                .unwrap_or(defaults.base_url),
            api_key: llm_file.api_key.or_else(|| cli.llm_api_key.clone()),
            api_key_command: llm_file.api_key_command,
            chat_model: llm_file.chat_model.unwrap_or(defaults.chat_model),
            json_model: llm_file.json_model.unwrap_or(defaults.json_model),
            temperature: llm_file.temperature.unwrap_or(defaults.temperature),
            max_tokens: llm_file.max_tokens,
            timeout_secs: llm_file.timeout_secs.unwrap_or(defaults.timeout_secs),
        };
        if !(0.0..=2.0).contains(&llm.temperature) {
            bail!("llm.temperature must be between 0.0 and 2.0");
        }

        let extraction_file = file.extraction.unwrap_or_default();
        let strategy = match extraction_file.strategy {
            Some(name) => JsonSpanStrategy::from_name(&name)
                .ok_or_else(|| anyhow!("Unknown extraction strategy: {}", name))?,
            None => JsonSpanStrategy::default(),
        };
        let extraction = ExtractionSettings {
            strategy,
            max_logged_chars: extraction_file
                .max_logged_chars
                .unwrap_or(ExtractionSettings::default().max_logged_chars),
        };

        let enrichment_file = file.enrichment.unwrap_or_default();
        let enrichment_defaults = EnrichmentSettings::default();
        let enrichment = EnrichmentSettings {
            enabled: enrichment_file
                .enabled
                .unwrap_or(enrichment_defaults.enabled),
            lookup_timeout_secs: enrichment_file
                .lookup_timeout_secs
                .unwrap_or(enrichment_defaults.lookup_timeout_secs),
            video_query_suffix: enrichment_file
                .video_query_suffix
                .unwrap_or(enrichment_defaults.video_query_suffix),
        };

        let youtube_file = file.youtube.unwrap_or_default();
        let youtube = youtube_file
            .api_key
            .or_else(|| cli.youtube_api_key.clone())
            .map(|api_key| YouTubeSettings {
                api_key,
                base_url: youtube_file
                    .base_url
                    .unwrap_or_else(|| DEFAULT_YOUTUBE_BASE_URL.to_string()),
            });

        let spotify_file = file.spotify.unwrap_or_default();
        let client_id = spotify_file
            .client_id
            .or_else(|| cli.spotify_client_id.clone());
        let client_secret = spotify_file
            .client_secret
            .or_else(|| cli.spotify_client_secret.clone());
        let spotify = match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Some(SpotifySettings {
                client_id,
                client_secret,
                accounts_url: spotify_file
                    .accounts_url
                    .unwrap_or_else(|| DEFAULT_SPOTIFY_ACCOUNTS_URL.to_string()),
                api_url: spotify_file
                    .api_url
                    .unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string()),
                market: spotify_file.market.unwrap_or_else(|| "US".to_string()),
            }),
            (None, None) => None,
            _ => bail!("Both spotify client id and client secret must be provided together"),
        };

        Ok(Self {
            port,
            metrics_port,
            logging_level,
            frontend_dir_path,
            session_secret,
            llm,
            extraction,
            enrichment,
            youtube,
            spotify,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_key_command: Option<String>,
    pub chat_model: String,
    pub json_model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            api_key: None,
            api_key_command: None,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            json_model: DEFAULT_JSON_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: None,
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    pub strategy: JsonSpanStrategy,
    /// Raw model output longer than this is truncated in logs.
    pub max_logged_chars: usize,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            strategy: JsonSpanStrategy::default(),
            max_logged_chars: 2000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnrichmentSettings {
    pub enabled: bool,
    pub lookup_timeout_secs: u64,
    pub video_query_suffix: String,
}

impl EnrichmentSettings {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            lookup_timeout_secs: 5,
            video_query_suffix: "official audio".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct YouTubeSettings {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub accounts_url: String,
    pub api_url: String,
    pub market: String,
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
