//! ChordScout server library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod chords;
pub mod config;
pub mod extraction;
pub mod llm;
pub mod media;
pub mod prompts;
pub mod recommendations;
pub mod server;

// Re-export commonly used types for convenience
pub use recommendations::{RecommendationService, RecommendationSettings};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerState};
