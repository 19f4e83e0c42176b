/// Metrics and telemetry for the event chain service
///
/// Provides Prometheus-compatible metrics for monitoring:
/// - HTTP request counts
/// - Single event reads by outcome
/// - Chain walks by outcome and length

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter_vec, Encoder, Histogram, IntCounterVec, TextEncoder,
};

lazy_static! {
    // ========== HTTP Metrics ==========

    /// Total HTTP requests by method and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "status"]
    )
    .unwrap();

    // ========== Event Chain Metrics ==========

    /// Single event reads by outcome
    pub static ref EVENT_FETCHES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "event_fetches_total",
        "Total number of single event reads from the blob store",
        &["outcome"]
    )
    .unwrap();

    /// History requests by outcome
    pub static ref CHAIN_WALKS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "chain_walks_total",
        "Total number of chain walks",
        &["outcome"]
    )
    .unwrap();

    /// Hops per completed chain walk
    pub static ref CHAIN_WALK_HOPS: Histogram = register_histogram!(
        "chain_walk_hops",
        "Number of events returned by completed chain walks",
        vec![1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 1000.0, 10000.0]
    )
    .unwrap();
}

/// Render metrics in Prometheus text format
pub fn render_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "metrics_encode_failed");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Record an HTTP request
pub fn record_http_request(method: &str, status: u16) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, &status.to_string()])
        .inc();
}

/// Record a single event read
pub fn record_event_fetch(outcome: &str) {
    EVENT_FETCHES_TOTAL.with_label_values(&[outcome]).inc();
}

/// Record a chain walk, with its length when it completed
pub fn record_chain_walk(outcome: &str, hops: Option<usize>) {
    CHAIN_WALKS_TOTAL.with_label_values(&[outcome]).inc();
    if let Some(hops) = hops {
        CHAIN_WALK_HOPS.observe(hops as f64);
    }
}
