//! Narrative enrichment through an OpenAI-compatible completion service.
//!
//! This crate builds the narrative prompt for a symptom query, sends it to a
//! completion service and parses the reply fail-soft into an
//! [`EnrichedNarrative`](kantan_core::models::EnrichedNarrative).

pub mod client;
pub mod narrative;
pub mod prompts;

pub use client::*;
pub use narrative::*;
pub use prompts::*;

use kantan_core::models::SymptomQuery;
use kantan_core::triage::Enrichment;
use tracing::{info, warn};

/// Enrich a query with a model-generated narrative.
///
/// Never fails: a reply that is not valid JSON yields the neutral
/// narrative, and a failed call (transport, status, timeout) yields
/// [`Enrichment::Unavailable`].
pub async fn enrich(client: &dyn CompletionClient, query: &SymptomQuery) -> Enrichment {
    let prompt = NarrativePrompt::from_query(query).render();

    match client.complete(&prompt).await {
        Ok(output) => {
            let narrative = parse_narrative(&output);
            info!(
                model = client.model(),
                tests = narrative.recommended_tests.len(),
                remedies = narrative.relief_remedies.len(),
                "Narrative enrichment complete"
            );
            Enrichment::Completed(narrative)
        }
        Err(e) => {
            warn!(model = client.model(), error = %e, "Completion failed, continuing without narrative");
            Enrichment::Unavailable
        }
    }
}
