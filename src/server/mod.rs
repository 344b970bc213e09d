pub mod config;
mod error;
mod http_layers;
mod media_routes;
pub mod metrics;
mod recommendation_routes;
#[allow(clippy::module_inception)]
pub mod server;
pub mod session;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use http_layers::*;
pub use server::{make_app, run_server};
pub use session::{SessionKeys, UserType};
pub use state::ServerState;
