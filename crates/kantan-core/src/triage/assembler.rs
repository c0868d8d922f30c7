//! Response assembly.

use crate::models::{
    DiagnosticAlert, EnrichedNarrative, MatchResult, ResolvedSpecialtySet, RiskFlag,
    SymptomCheckResponse,
};

/// Merge the pipeline outputs into the response contract.
///
/// Pure: sub-results are moved in unchanged. Without a narrative the
/// suggestion lists are empty and the summary names only the specialties.
pub fn assemble(
    specialties: &ResolvedSpecialtySet,
    matches: MatchResult,
    narrative: Option<&EnrichedNarrative>,
    risk_flags: Vec<RiskFlag>,
) -> SymptomCheckResponse {
    let (recommended_tests, relief_remedies) = narrative
        .map(|n| (n.recommended_tests.clone(), n.relief_remedies.clone()))
        .unwrap_or_default();

    SymptomCheckResponse {
        summary: summarize(specialties, narrative),
        diagnostic_alert: DiagnosticAlert::default(),
        recommended_tests,
        relief_remedies,
        recommended_doctors: matches.doctors,
        nearby_clinics: matches.clinics,
        keywords: specialties.to_vec(),
        risk_flags,
    }
}

fn summarize(specialties: &ResolvedSpecialtySet, narrative: Option<&EnrichedNarrative>) -> String {
    let names: Vec<&str> = specialties.iter().collect();
    let mut summary = format!(
        "Based on your symptoms, consider consulting: {}.",
        names.join(", ")
    );

    if let Some(text) = narrative
        .map(|n| n.diagnostic_summary.trim())
        .filter(|s| !s.is_empty())
    {
        summary.push(' ');
        summary.push_str(text);
    }

    summary
}
