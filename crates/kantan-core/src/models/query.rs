//! Inbound symptom query models.

use serde::{Deserialize, Serialize};

/// Highest severity on the 1-10 scale.
pub const MAX_SEVERITY: i32 = 10;

/// A symptom report submitted by a client.
///
/// Request-scoped: built from the request body and dropped once the response
/// has been assembled.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymptomQuery {
    /// Free-text symptom description
    pub description: String,
    /// How long the symptoms have lasted (e.g. "2 days")
    #[serde(default)]
    pub duration: Option<String>,
    /// Severity on a 1-10 scale. `0` means "not selected".
    #[serde(default)]
    pub severity: Option<i32>,
    /// Affected body parts (e.g. ["head", "stomach"])
    #[serde(default)]
    pub body_parts: Vec<String>,
    /// Additional context tags (e.g. ["office stress"])
    #[serde(default)]
    pub context: Vec<String>,
    /// Optional location restriction for provider matching
    #[serde(default)]
    pub location: Option<LocationFilter>,
}

impl SymptomQuery {
    /// Create a query holding only a description.
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            ..Default::default()
        }
    }

    /// Check field ranges. Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(severity) = self.severity {
            if !(0..=MAX_SEVERITY).contains(&severity) {
                return Err(format!(
                    "severity must be between 1 and {MAX_SEVERITY}, got {severity}"
                ));
            }
        }
        Ok(())
    }

    /// Severity with the "not selected" sentinel (`0`) mapped to `None`.
    pub fn effective_severity(&self) -> Option<i32> {
        self.severity.filter(|s| *s > 0)
    }

    /// Duration with blank strings treated as absent.
    pub fn effective_duration(&self) -> Option<&str> {
        self.duration
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Location filter, if at least one field is set.
    pub fn location_filter(&self) -> Option<&LocationFilter> {
        self.location.as_ref().filter(|f| !f.is_empty())
    }
}

/// Equality predicates applied to the location side of the provider join.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationFilter {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl LocationFilter {
    /// True when no predicate would be applied.
    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }

    /// Non-blank `(column, value)` pairs in a fixed column order.
    pub fn predicates(&self) -> Vec<(&'static str, &str)> {
        [
            ("city", self.city.as_deref()),
            ("district", self.district.as_deref()),
            ("country", self.country.as_deref()),
        ]
        .into_iter()
        .filter_map(|(column, value)| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (column, v))
        })
        .collect()
    }
}
