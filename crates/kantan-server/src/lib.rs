//! HTTP surface for the KantanCare triage helper.
//!
//! `POST /symptom-check` runs enrichment (when configured) and the triage
//! pipeline, `GET /health` checks the directory store and `GET /metrics`
//! exposes Prometheus counters.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod state;

pub use api::create_router;
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
