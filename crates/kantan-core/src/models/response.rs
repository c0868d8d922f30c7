//! Outbound symptom-check response.

use serde::{Deserialize, Serialize};

use super::{ClinicView, DoctorView, RecommendedTest, ReliefRemedy};

/// Severity label shown on every alert.
pub const PLACEHOLDER_ALERT_SEVERITY: &str = "Moderate";

/// Alert badge values. Static placeholders; no triage scoring backs them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosticAlert {
    pub severity: String,
    pub contagious: bool,
}

impl Default for DiagnosticAlert {
    fn default() -> Self {
        Self {
            severity: PLACEHOLDER_ALERT_SEVERITY.to_string(),
            contagious: false,
        }
    }
}

/// Flags raised from the raw query, independent of the narrative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskFlag {
    /// Self-reported severity of 8 or more
    HighSeverity,
    /// Description mentions an emergency phrase
    Emergency,
}

/// Final response for `POST /symptom-check`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymptomCheckResponse {
    pub summary: String,
    pub diagnostic_alert: DiagnosticAlert,
    pub recommended_tests: Vec<RecommendedTest>,
    pub relief_remedies: Vec<ReliefRemedy>,
    pub recommended_doctors: Vec<DoctorView>,
    pub nearby_clinics: Vec<ClinicView>,
    /// Resolved specialty set, disclosed to the caller as keywords
    pub keywords: Vec<String>,
    pub risk_flags: Vec<RiskFlag>,
}
