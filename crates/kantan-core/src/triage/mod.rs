//! Request-time triage pipeline.
//!
//! ```text
//! SymptomQuery ──► (narrative, produced by the caller)
//!      │
//!      ▼
//! SpecialtyResolver ──► ProviderMatcher ──► assemble ──► SymptomCheckResponse
//! ```
//!
//! The narrative is fetched by the caller before `run` so that no store
//! connection is held across the completion call.

mod assembler;

pub use assembler::*;

use std::sync::Arc;

use tracing::{debug, info};

use crate::db::Store;
use crate::models::{EnrichedNarrative, SymptomCheckResponse, SymptomQuery};
use crate::resolver::{
    assess_risk, ProviderMatcher, ResolverResult, SpecialtyMatcher, SpecialtyResolver,
};

/// Outcome of narrative enrichment for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment {
    /// Enrichment is switched off.
    Disabled,
    /// The completion call itself failed (transport, status, timeout).
    Unavailable,
    /// The model answered. May be the neutral narrative after a parse failure.
    Completed(EnrichedNarrative),
}

impl Enrichment {
    /// Text fed to the specialty resolver.
    ///
    /// A completed narrative's description wins even when it is empty; the
    /// resolver then falls back to the general physician.
    pub fn resolver_text<'a>(&'a self, query: &'a SymptomQuery) -> &'a str {
        match self {
            Enrichment::Completed(narrative) => &narrative.description,
            Enrichment::Disabled | Enrichment::Unavailable => &query.description,
        }
    }

    pub fn narrative(&self) -> Option<&EnrichedNarrative> {
        match self {
            Enrichment::Completed(narrative) => Some(narrative),
            _ => None,
        }
    }
}

/// Store-backed triage: resolve, match, assemble.
#[derive(Clone)]
pub struct TriagePipeline {
    store: Store,
    matcher: Arc<dyn SpecialtyMatcher>,
}

impl TriagePipeline {
    pub fn new(store: Store, matcher: Arc<dyn SpecialtyMatcher>) -> Self {
        Self { store, matcher }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Run the store-backed stages for one query.
    ///
    /// Blocking. The connection is acquired separately for resolution and
    /// for matching and released after each.
    pub fn run(
        &self,
        query: &SymptomQuery,
        enrichment: &Enrichment,
    ) -> ResolverResult<SymptomCheckResponse> {
        let text = enrichment.resolver_text(query);

        let specialties = {
            let db = self.store.acquire()?;
            SpecialtyResolver::new(&db, self.matcher.as_ref()).resolve(text)?
        };

        let matches = {
            let db = self.store.acquire()?;
            ProviderMatcher::new(&db).match_providers(&specialties, query.location_filter())?
        };

        let risk_flags = assess_risk(query);
        debug!(flags = ?risk_flags, "Assessed risk");

        let response = assemble(&specialties, matches, enrichment.narrative(), risk_flags);

        info!(
            specialties = response.keywords.len(),
            doctors = response.recommended_doctors.len(),
            clinics = response.nearby_clinics.len(),
            enriched = enrichment.narrative().is_some(),
            "Triage complete"
        );

        Ok(response)
    }
}

impl std::fmt::Debug for TriagePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriagePipeline")
            .field("matcher", &self.matcher.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Doctor, Hospital, Location, ProblemSpecialtyMapping, RiskFlag};
    use crate::resolver::SubstringMatcher;

    fn setup_pipeline() -> TriagePipeline {
        let store = Store::open_in_memory().unwrap();
        {
            let db = store.acquire().unwrap();
            db.upsert_problem_mapping(&ProblemSpecialtyMapping::new("headache", "neurologist", Some(0.9)))
                .unwrap();
            db.insert_location(&Location {
                id: 1,
                city: "Lalitpur".into(),
                district: "Lalitpur".into(),
                country: "Nepal".into(),
            })
            .unwrap();
            db.insert_hospital(&Hospital {
                id: 1,
                name: "Patan Hospital".into(),
                hospital_type: "HOSPITAL".into(),
                address: Some("Lagankhel".into()),
                location_id: Some(1),
            })
            .unwrap();
            db.insert_doctor(&Doctor {
                id: 1,
                name: "Dr. Maharjan".into(),
                specialty: "Neurologist".into(),
                qualification: Some("DM".into()),
                nmc_number: None,
                hospital_id: Some(1),
            })
            .unwrap();
            db.insert_doctor(&Doctor {
                id: 2,
                name: "Dr. Joshi".into(),
                specialty: "General Physician".into(),
                qualification: Some("MBBS".into()),
                nmc_number: None,
                hospital_id: Some(1),
            })
            .unwrap();
        }
        TriagePipeline::new(store, Arc::new(SubstringMatcher))
    }

    #[test]
    fn test_run_without_enrichment_uses_raw_text() {
        let pipeline = setup_pipeline();
        let query = SymptomQuery::new("throbbing headache");

        let response = pipeline.run(&query, &Enrichment::Disabled).unwrap();

        assert_eq!(response.keywords, vec!["neurologist"]);
        assert_eq!(response.recommended_doctors[0].doctor_name, "Dr. Maharjan");
        assert_eq!(response.nearby_clinics.len(), 1);
        assert!(response.recommended_tests.is_empty());
    }

    #[test]
    fn test_run_completed_description_replaces_raw_text() {
        let pipeline = setup_pipeline();
        let query = SymptomQuery::new("my head has been pounding since yesterday");
        let narrative = EnrichedNarrative {
            description: "headache".into(),
            diagnostic_summary: "Likely a tension headache.".into(),
            ..Default::default()
        };

        let response = pipeline
            .run(&query, &Enrichment::Completed(narrative))
            .unwrap();

        assert_eq!(response.keywords, vec!["neurologist"]);
        assert!(response.summary.ends_with("Likely a tension headache."));
    }

    #[test]
    fn test_run_neutral_narrative_falls_back() {
        let pipeline = setup_pipeline();
        let query = SymptomQuery::new("headache");

        let response = pipeline
            .run(&query, &Enrichment::Completed(EnrichedNarrative::neutral()))
            .unwrap();

        // Empty description resolves to the default specialty, not the raw text
        assert_eq!(response.keywords, vec!["general physician"]);
        assert_eq!(response.recommended_doctors[0].doctor_name, "Dr. Joshi");
    }

    #[test]
    fn test_run_unavailable_degrades() {
        let pipeline = setup_pipeline();
        let mut query = SymptomQuery::new("sudden headache after a stroke");
        query.severity = Some(9);

        let response = pipeline.run(&query, &Enrichment::Unavailable).unwrap();

        assert_eq!(response.keywords, vec!["neurologist"]);
        assert!(!response.summary.contains("Unable to parse"));
        assert_eq!(
            response.risk_flags,
            vec![RiskFlag::HighSeverity, RiskFlag::Emergency]
        );
    }

    #[test]
    fn test_run_location_filter() {
        let pipeline = setup_pipeline();
        let mut query = SymptomQuery::new("headache");
        query.location = Some(crate::models::LocationFilter {
            city: Some("Pokhara".into()),
            ..Default::default()
        });

        let response = pipeline.run(&query, &Enrichment::Disabled).unwrap();
        assert!(response.recommended_doctors.is_empty());
        assert!(response.nearby_clinics.is_empty());
    }

    #[test]
    fn test_run_store_failure_propagates() {
        let pipeline = setup_pipeline();
        pipeline
            .store()
            .acquire()
            .unwrap()
            .conn()
            .execute_batch("DROP TABLE doctors;")
            .unwrap();

        let result = pipeline.run(&SymptomQuery::new("headache"), &Enrichment::Disabled);
        assert!(result.is_err());
    }
}
