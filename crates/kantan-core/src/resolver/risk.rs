//! Risk flags raised from the raw symptom query.

use crate::models::{RiskFlag, SymptomQuery};

/// Severity at or above which `HIGH_SEVERITY` is raised.
pub const HIGH_SEVERITY_THRESHOLD: i32 = 8;

/// Phrases that mark a description as a possible emergency.
pub const EMERGENCY_PHRASES: &[&str] = &[
    "chest pain",
    "difficulty breathing",
    "severe bleeding",
    "unconscious",
    "stroke",
    "heart attack",
];

/// Flags for the query, in a fixed order (high severity first).
pub fn assess_risk(query: &SymptomQuery) -> Vec<RiskFlag> {
    let mut flags = Vec::new();

    if query
        .effective_severity()
        .is_some_and(|s| s >= HIGH_SEVERITY_THRESHOLD)
    {
        flags.push(RiskFlag::HighSeverity);
    }

    let description = query.description.to_lowercase();
    if EMERGENCY_PHRASES.iter().any(|p| description.contains(p)) {
        flags.push(RiskFlag::Emergency);
    }

    flags
}
