//! Prometheus metrics for the triage server.

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter_vec, Histogram,
    HistogramVec, IntCounterVec,
};

/// Label used for any path the router does not serve.
pub const UNMATCHED_ROUTE: &str = "unmatched";

const ROUTES: [&str; 3] = ["/symptom-check", "/health", "/metrics"];

lazy_static! {
    /// Total HTTP requests by method, route and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "kantan_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "kantan_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    /// Time spent resolving specialties and matching providers
    pub static ref SYMPTOM_ANALYSIS_DURATION_SECONDS: Histogram = register_histogram!(
        "kantan_symptom_analysis_duration_seconds",
        "Symptom analysis duration in seconds",
        vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register SYMPTOM_ANALYSIS_DURATION_SECONDS");

    /// Narrative enrichment outcomes (completed, unavailable, disabled)
    pub static ref ENRICHMENT_TOTAL: IntCounterVec = register_int_counter_vec!(
        "kantan_enrichment_total",
        "Narrative enrichment attempts by outcome",
        &["outcome"]
    )
    .expect("Failed to register ENRICHMENT_TOTAL");
}

/// Route label for a request path. Unknown paths share one label.
pub fn route_label(path: &str) -> &'static str {
    ROUTES
        .iter()
        .copied()
        .find(|route| *route == path)
        .unwrap_or(UNMATCHED_ROUTE)
}
