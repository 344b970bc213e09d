//! Test server lifecycle management
//!
//! Each test gets an isolated server wired to its own fake upstream services.

use super::constants::*;
use super::upstream::{FakeUpstream, ModelScripts};
use chordscout_server::config::{AppConfig, CliConfig, FileConfig};
use chordscout_server::llm::ModelRegistry;
use chordscout_server::server::{make_app, RequestsLoggingLevel, ServerState};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance
///
/// When dropped, the server and its fake upstream shut down and the temp
/// config directory is removed.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The fake model, video and track services behind the server
    pub upstream: FakeUpstream,

    // Private fields - keep resources alive until drop
    _temp_config_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

fn write_config(dir: &TempDir, upstream_url: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    let content = format!(
        r#"
session_secret = "{secret}"
logging_level = "none"

[llm]
base_url = "{upstream}/v1"
api_key = "{llm_key}"
chat_model = "{chat}"
json_model = "{json}"
timeout_secs = 10

[extraction]
strategy = "greedy"

[enrichment]
lookup_timeout_secs = {lookup_timeout}

[youtube]
api_key = "{youtube_key}"
base_url = "{upstream}/youtube"

[spotify]
client_id = "{spotify_id}"
client_secret = "{spotify_secret}"
accounts_url = "{upstream}/spotify/accounts"
api_url = "{upstream}/spotify/api"
"#,
        secret = TEST_SESSION_SECRET,
        upstream = upstream_url,
        llm_key = LLM_API_KEY,
        chat = CHAT_MODEL,
        json = JSON_MODEL,
        lookup_timeout = LOOKUP_TIMEOUT_SECS,
        youtube_key = YOUTUBE_API_KEY,
        spotify_id = SPOTIFY_CLIENT_ID,
        spotify_secret = SPOTIFY_CLIENT_SECRET,
    );
    std::fs::write(&path, content).expect("Failed to write test config");
    path
}

impl TestServer {
    /// Spawns a new test server on a random port
    ///
    /// This function:
    /// 1. Starts the fake upstream services answering with `scripts`
    /// 2. Writes a TOML config pointing at them and resolves it
    /// 3. Binds to a random port (127.0.0.1:0)
    /// 4. Spawns the server in a background task
    /// 5. Waits for the server to be ready
    ///
    /// # Panics
    ///
    /// Panics if any of the steps above fails.
    pub async fn spawn(scripts: ModelScripts) -> Self {
        let upstream = FakeUpstream::spawn(scripts).await;

        let temp_config_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = write_config(&temp_config_dir, &upstream.base_url);
        let file_config = FileConfig::load(&config_path).expect("Failed to load test config");

        let cli = CliConfig {
            logging_level: RequestsLoggingLevel::None,
            ..Default::default()
        };
        let app_config =
            AppConfig::resolve(&cli, Some(file_config)).expect("Failed to resolve test config");
        let models = Arc::new(ModelRegistry::from_settings(&app_config.llm));
        let state =
            ServerState::from_config(&app_config, models).expect("Failed to build server state");
        let app = make_app(state);

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            upstream,
            _temp_config_dir: temp_config_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!("Server failed to become ready within {:?}", timeout);
            }

            if let Ok(response) = client.get(&self.base_url).send().await {
                if response.status().is_success() {
                    return;
                }
            }

            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
