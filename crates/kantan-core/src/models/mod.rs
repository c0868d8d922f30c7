//! Domain models for the triage pipeline.

mod directory;
mod matching;
mod narrative;
mod query;
mod response;

pub use directory::*;
pub use matching::*;
pub use narrative::*;
pub use query::*;
pub use response::*;
