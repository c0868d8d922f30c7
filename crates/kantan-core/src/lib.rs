//! KantanCare Core Library
//!
//! Pre-consultation triage: free-text symptoms in, candidate specialties and
//! matching doctors and clinics out.
//!
//! # Architecture
//!
//! ```text
//!                  symptom text (or LLM-distilled keywords)
//!                                  │
//!                          Keyword Extraction
//!                                  │
//!                  ┌───────────────▼───────────────┐
//!                  │  Specialty Matching           │
//!                  │  token ⊂ problem_specialty_map│
//!                  │  empty → "general physician"  │
//!                  └───────────────┬───────────────┘
//!                                  │
//!                  doctors ⋈ hospitals ⋈ locations
//!                                  │
//!                   dedup rows / clinics by name / cap 5
//!                                  │
//!                          Response Assembly
//! ```
//!
//! The directory tables are filled offline by [`ingest`] and are read-only
//! while requests are served.
//!
//! # Modules
//!
//! - [`db`]: SQLite store for the directory and lookup table
//! - [`models`]: Domain types (SymptomQuery, ProviderRow, SymptomCheckResponse, etc.)
//! - [`resolver`]: Keyword extraction, specialty matching, provider matching
//! - [`triage`]: Request pipeline and response assembly
//! - [`ingest`]: Scraped-record normalization

pub mod db;
pub mod ingest;
pub mod models;
pub mod resolver;
pub mod triage;

// Re-export commonly used types
pub use db::{Database, DbError, Store};
pub use models::{
    ClinicView, DoctorView, EnrichedNarrative, LocationFilter, MatchResult, ResolvedSpecialtySet,
    SymptomCheckResponse, SymptomQuery,
};
pub use resolver::{MatchingAlgorithm, ResolverError, SpecialtyMatcher};
pub use triage::{Enrichment, TriagePipeline};
