//! Specialty set → doctors and clinics.

use std::collections::HashSet;

use tracing::debug;

use crate::db::Database;
use crate::models::{
    ClinicView, DoctorView, LocationFilter, MatchResult, ProviderRow, ResolvedSpecialtySet,
};

use super::ResolverResult;

/// Maximum number of doctors returned per request.
pub const MAX_RECOMMENDED_DOCTORS: usize = 5;

/// Looks up providers for a resolved specialty set.
pub struct ProviderMatcher<'a> {
    db: &'a Database,
}

impl<'a> ProviderMatcher<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Find doctors and clinics for the given specialties.
    ///
    /// Zero rows is a valid, empty result. Store failures propagate.
    pub fn match_providers(
        &self,
        specialties: &ResolvedSpecialtySet,
        filter: Option<&LocationFilter>,
    ) -> ResolverResult<MatchResult> {
        let rows = self.db.find_providers(specialties, filter)?;
        let result = build_match_result(rows);

        debug!(
            doctors = result.doctors.len(),
            clinics = result.clinics.len(),
            filtered = filter.is_some(),
            "Matched providers"
        );

        Ok(result)
    }
}

/// Shape joined rows into the doctor and clinic lists.
///
/// Exact duplicate rows are dropped (first occurrence kept). Clinics are
/// unique by hospital name and built from every row; doctors are cut to
/// [`MAX_RECOMMENDED_DOCTORS`] afterwards, so a clinic may appear whose
/// doctor did not make the cut.
pub fn build_match_result(rows: Vec<ProviderRow>) -> MatchResult {
    let rows = dedup_rows(rows);

    let mut seen_hospitals = HashSet::new();
    let clinics: Vec<ClinicView> = rows
        .iter()
        .filter(|row| seen_hospitals.insert(row.hospital_name.as_str()))
        .map(ClinicView::from)
        .collect();

    let doctors: Vec<DoctorView> = rows
        .iter()
        .take(MAX_RECOMMENDED_DOCTORS)
        .map(DoctorView::from)
        .collect();

    MatchResult { doctors, clinics }
}

/// Drop exact duplicate rows, keeping first-seen order.
pub fn dedup_rows(rows: Vec<ProviderRow>) -> Vec<ProviderRow> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect()
}
