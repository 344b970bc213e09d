use anyhow::Result;
use chordscout_server::config::{AppConfig, CliConfig, FileConfig};
use chordscout_server::llm::{ModelRegistry, ModelRole};
use chordscout_server::server::{metrics, run_server, RequestsLoggingLevel, ServerState};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Secret used to verify session tokens.
    #[clap(long, env = "CHORDSCOUT_SESSION_SECRET", hide_env_values = true)]
    pub session_secret: Option<String>,

    /// Base URL of the OpenAI-compatible model API.
    #[clap(long)]
    pub llm_base_url: Option<String>,

    /// API key of the model API.
    #[clap(long, env = "XAI_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// YouTube Data API key, video lookups are disabled without it.
    #[clap(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub youtube_api_key: Option<String>,

    /// Spotify client id, track lookups are disabled without it.
    #[clap(long, env = "SPOTIFY_CLIENT_ID")]
    pub spotify_client_id: Option<String>,

    /// Spotify client secret.
    #[clap(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub spotify_client_secret: Option<String>,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        CliConfig {
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            frontend_dir_path: args.frontend_dir_path.clone(),
            session_secret: args.session_secret.clone(),
            llm_base_url: args.llm_base_url.clone(),
            llm_api_key: args.llm_api_key.clone(),
            youtube_api_key: args.youtube_api_key.clone(),
            spotify_client_id: args.spotify_client_id.clone(),
            spotify_client_secret: args.spotify_client_secret.clone(),
        }
    }
}

/// Probe every configured model once so a bad key shows up at startup.
async fn check_models(registry: &ModelRegistry) {
    for role in [ModelRole::Json, ModelRole::Chat] {
        let Ok(provider) = registry.get(role) else {
            continue;
        };
        match provider.health_check().await {
            Ok(()) => info!("Model {} ({}) is reachable", provider.model(), role),
            Err(e) => warn!(
                "Model {} ({}) failed its health check: {}",
                provider.model(),
                role,
                e
            ),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: CliConfig = (&cli_args).into();
    let app_config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  port: {}", app_config.port);
    info!("  metrics_port: {}", app_config.metrics_port);
    info!("  llm: {}", app_config.llm.base_url);
    info!(
        "  models: {} (chat), {} (json)",
        app_config.llm.chat_model, app_config.llm.json_model
    );
    info!("  extraction strategy: {}", app_config.extraction.strategy.as_str());
    info!("  enrichment enabled: {}", app_config.enrichment.enabled);

    info!("Initializing metrics...");
    metrics::init_metrics();

    let models = Arc::new(ModelRegistry::from_settings(&app_config.llm));
    check_models(&models).await;

    let state = ServerState::from_config(&app_config, models)?;

    info!("Ready to serve at port {}!", app_config.port);
    info!("Metrics available at port {}!", app_config.metrics_port);
    run_server(state).await
}
