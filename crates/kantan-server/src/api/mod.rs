//! Router assembly.

mod handlers;
mod middleware;

pub use handlers::{HealthResponse, HEALTH_OK, METRICS_CONTENT_TYPE};
pub use middleware::{cors, metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = cors(&state.config.server.cors_origins);

    Router::new()
        .route("/symptom-check", post(handlers::symptom_check))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state)
}
