//! Random slowdown middleware, used to exercise loading states in the UI.

use axum::body::Body;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::IntoResponse;
use rand_distr::{Distribution, Normal};
use std::time::Duration;

const MEAN_DELAY_MS: f64 = 1000.0;
const DELAY_STD_DEV_MS: f64 = 2000.0;

fn random_delay() -> Duration {
    let millis = match Normal::new(MEAN_DELAY_MS, DELAY_STD_DEV_MS) {
        Ok(normal) => normal.sample(&mut rand::rng()).max(0.0),
        Err(_) => MEAN_DELAY_MS,
    };
    Duration::from_millis(millis as u64)
}

/// Delays every request by a gaussian amount of time, negative samples
/// clamped to zero.
pub async fn slowdown_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    tokio::time::sleep(random_delay()).await;
    next.run(request).await
}
