//! Shared constants for end-to-end tests
//!
//! When fake upstream behavior or test credentials change, update only this file.

// ============================================================================
// Session
// ============================================================================

/// Secret shared by the test server and the test client
pub const TEST_SESSION_SECRET: &str = "e2e-session-secret";

/// Subject of the tokens minted by the test client
pub const TEST_USER_ID: &str = "e2e-user";

// ============================================================================
// Fake upstream identities
// ============================================================================

/// Model id the server uses for song suggestions
pub const CHAT_MODEL: &str = "fake-chat-model";

/// Model id the server uses for chord analysis
pub const JSON_MODEL: &str = "fake-json-model";

pub const LLM_API_KEY: &str = "fake-llm-key";

pub const YOUTUBE_API_KEY: &str = "fake-youtube-key";

pub const SPOTIFY_CLIENT_ID: &str = "fake-client-id";
pub const SPOTIFY_CLIENT_SECRET: &str = "fake-client-secret";
pub const SPOTIFY_ACCESS_TOKEN: &str = "fake-access-token";

/// Video searches containing this marker answer after the lookup timeout
pub const SLOW_VIDEO_MARKER: &str = "Slow";

/// Searches containing this marker find nothing
pub const NO_MATCH_MARKER: &str = "Nowhere";

// ============================================================================
// Timeouts
// ============================================================================

/// Media lookup timeout configured on the test server
pub const LOOKUP_TIMEOUT_SECS: u64 = 1;

/// How long the fake video search stalls on slow queries
pub const SLOW_VIDEO_DELAY_MS: u64 = 3000;

/// Maximum time to wait for the server to become ready
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout of each test client request
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
