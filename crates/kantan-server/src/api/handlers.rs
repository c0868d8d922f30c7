//! Request handlers.

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use kantan_core::models::{SymptomCheckResponse, SymptomQuery};
use kantan_core::triage::Enrichment;
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Content type of the Prometheus text exposition format.
pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub const HEALTH_OK: &str = "ok";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// `POST /symptom-check`
pub async fn symptom_check(
    State(state): State<AppState>,
    body: Result<Json<SymptomQuery>, JsonRejection>,
) -> ApiResult<Json<SymptomCheckResponse>> {
    let Json(query) = body?;
    query.validate().map_err(ApiError::Validation)?;

    // Completion runs before any store connection is taken
    let enrichment = match &state.completion {
        Some(client) => kantan_llm::enrich(client.as_ref(), &query).await,
        None => Enrichment::Disabled,
    };
    debug!(enriched = enrichment.narrative().is_some(), "Enrichment finished");
    metrics::ENRICHMENT_TOTAL
        .with_label_values(&[enrichment_outcome(&enrichment)])
        .inc();

    let pipeline = state.pipeline.clone();
    let response = tokio::task::spawn_blocking(move || {
        let timer = metrics::SYMPTOM_ANALYSIS_DURATION_SECONDS.start_timer();
        let result = pipeline.run(&query, &enrichment);
        timer.observe_duration();
        result
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Triage task failed: {}", e)))??;

    Ok(Json(response))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let store = state.store().clone();
    let ping = tokio::task::spawn_blocking(move || {
        let db = store.acquire()?;
        db.ping()
    });
    ping.await
        .map_err(|e| ApiError::Internal(format!("Health check failed: {}", e)))?
        .map_err(|e| ApiError::Unavailable(e.to_string()))?;

    Ok(Json(HealthResponse {
        status: HEALTH_OK.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// `GET /metrics`
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                b"Failed to encode metrics".to_vec(),
            )
        }
    }
}

fn enrichment_outcome(enrichment: &Enrichment) -> &'static str {
    match enrichment {
        Enrichment::Disabled => "disabled",
        Enrichment::Unavailable => "unavailable",
        Enrichment::Completed(_) => "completed",
    }
}
