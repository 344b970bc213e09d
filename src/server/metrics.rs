use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all ChordScout metrics
const PREFIX: &str = "chordscout";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Model Metrics
    pub static ref MODEL_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_model_request_duration_seconds"),
            "Time from model request to fully accumulated response"
        )
        .buckets(vec![0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0]),
        &["role", "outcome"]
    ).expect("Failed to create model_request_duration_seconds metric");

    pub static ref MODEL_ERRORS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_model_errors_total"), "Model call failures by kind"),
        &["role", "kind"]
    ).expect("Failed to create model_errors_total metric");

    // Extraction Metrics
    pub static ref EXTRACTIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_extractions_total"), "Extraction outcomes by schema"),
        &["schema", "outcome"]
    ).expect("Failed to create extractions_total metric");

    pub static ref REJECTED_SONGS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_rejected_songs_total"), "Song records dropped by validation"),
        &["field"]
    ).expect("Failed to create rejected_songs_total metric");

    // Media Lookup Metrics
    pub static ref MEDIA_LOOKUPS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_media_lookups_total"), "Media lookups by service and outcome"),
        &["service", "outcome"]
    ).expect("Failed to create media_lookups_total metric");

    // Process Metrics
    pub static ref PROCESS_MEMORY_BYTES: Gauge = Gauge::new(
        format!("{PREFIX}_process_memory_bytes"),
        "Process memory usage in bytes"
    ).expect("Failed to create process_memory_bytes metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(MODEL_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(MODEL_ERRORS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(EXTRACTIONS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(REJECTED_SONGS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(MEDIA_LOOKUPS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(PROCESS_MEMORY_BYTES.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Record a finished model call, `outcome` being "ok" or an error kind
pub fn record_model_request(role: &str, outcome: &str, duration: Duration) {
    MODEL_REQUEST_DURATION_SECONDS
        .with_label_values(&[role, outcome])
        .observe(duration.as_secs_f64());

    if outcome != "ok" {
        MODEL_ERRORS_TOTAL.with_label_values(&[role, outcome]).inc();
    }
}

/// Record an extraction result for `schema` ("chords" or "songs")
pub fn record_extraction(schema: &str, outcome: &str) {
    EXTRACTIONS_TOTAL.with_label_values(&[schema, outcome]).inc();
}

pub fn record_rejected_song(field: &str) {
    REJECTED_SONGS_TOTAL.with_label_values(&[field]).inc();
}

pub fn record_media_lookup(service: &str, outcome: &str) {
    MEDIA_LOOKUPS_TOTAL
        .with_label_values(&[service, outcome])
        .inc();
}

/// Update process memory usage
pub fn update_memory_usage() {
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            for line in status.lines() {
                if line.starts_with("VmRSS:") {
                    // RSS is reported in kB
                    if let Some(kb_str) = line.split_whitespace().nth(1) {
                        if let Ok(kb) = kb_str.parse::<f64>() {
                            PROCESS_MEMORY_BYTES.set(kb * 1024.0);
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    update_memory_usage();

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_else(|_| String::from(""));
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
