use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub frontend_dir_path: Option<String>,
    pub session_secret: Option<String>,

    // Feature configs
    pub llm: Option<LlmConfig>,
    pub extraction: Option<ExtractionConfig>,
    pub enrichment: Option<EnrichmentConfig>,
    pub youtube: Option<YouTubeConfig>,
    pub spotify: Option<SpotifyConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    /// Shell command printing the API key, run before every request.
    pub api_key_command: Option<String>,
    pub chat_model: Option<String>,
    pub json_model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ExtractionConfig {
    /// JSON span strategy: "greedy" or "balanced".
    pub strategy: Option<String>,
    pub max_logged_chars: Option<usize>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub enabled: Option<bool>,
    pub lookup_timeout_secs: Option<u64>,
    pub video_query_suffix: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct YouTubeConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub accounts_url: Option<String>,
    pub api_url: Option<String>,
    pub market: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
