//! Symptom text → specialties → providers.
//!
//! Pipeline: Keyword Extraction → Specialty Matching → Provider Join → Dedup/Cap

mod keywords;
mod matcher;
mod providers;
mod risk;
mod specialty;

pub use keywords::*;
pub use matcher::*;
pub use providers::*;
pub use risk::*;
pub use specialty::*;

use thiserror::Error;

/// Resolver errors.
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),
}

pub type ResolverResult<T> = Result<T, ResolverError>;
