//! Structured narrative produced by the completion service.

use serde::{Deserialize, Deserializer, Serialize};

/// Most tests the narrative may suggest.
pub const MAX_RECOMMENDED_TESTS: usize = 3;

/// Most remedies the narrative may suggest.
pub const MAX_RELIEF_REMEDIES: usize = 2;

/// Summary used when the model output could not be parsed.
pub const UNPARSEABLE_SUMMARY: &str = "Unable to parse the diagnostic summary.";

/// A suggested diagnostic test.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendedTest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
}

/// A suggested home remedy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReliefRemedy {
    #[serde(default, deserialize_with = "null_as_default")]
    pub remedy: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// Narrative enrichment for one symptom query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnrichedNarrative {
    /// Bare problem keywords distilled from the complaint
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Short, diagnosis-free explanation
    #[serde(default, deserialize_with = "null_as_default")]
    pub diagnostic_summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommended_tests: Vec<RecommendedTest>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relief_remedies: Vec<ReliefRemedy>,
}

impl EnrichedNarrative {
    /// Substitute used when the model response is not valid JSON.
    pub fn neutral() -> Self {
        Self {
            description: String::new(),
            diagnostic_summary: UNPARSEABLE_SUMMARY.to_string(),
            recommended_tests: Vec::new(),
            relief_remedies: Vec::new(),
        }
    }

    /// Truncate suggestion lists to their caps and trim text fields.
    pub fn bounded(mut self) -> Self {
        self.description = self.description.trim().to_string();
        self.diagnostic_summary = self.diagnostic_summary.trim().to_string();
        self.recommended_tests.truncate(MAX_RECOMMENDED_TESTS);
        self.relief_remedies.truncate(MAX_RELIEF_REMEDIES);
        self
    }
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_shape() {
        let neutral = EnrichedNarrative::neutral();
        assert!(neutral.description.is_empty());
        assert_eq!(neutral.diagnostic_summary, UNPARSEABLE_SUMMARY);
        assert!(neutral.recommended_tests.is_empty());
        assert!(neutral.relief_remedies.is_empty());
    }

    #[test]
    fn test_bounded_truncates() {
        let narrative = EnrichedNarrative {
            description: " headache ".into(),
            diagnostic_summary: "summary".into(),
            recommended_tests: vec![RecommendedTest::default(); 5],
            relief_remedies: vec![ReliefRemedy::default(); 4],
        }
        .bounded();

        assert_eq!(narrative.description, "headache");
        assert_eq!(narrative.recommended_tests.len(), MAX_RECOMMENDED_TESTS);
        assert_eq!(narrative.relief_remedies.len(), MAX_RELIEF_REMEDIES);
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let narrative: EnrichedNarrative = serde_json::from_str(
            r#"{"description":"headache","diagnostic_summary":null,"recommended_tests":[{"name":null,"reason":"r"}],"relief_remedies":null}"#,
        )
        .unwrap();

        assert_eq!(narrative.description, "headache");
        assert_eq!(narrative.diagnostic_summary, "");
        assert_eq!(narrative.recommended_tests[0].name, "");
        assert_eq!(narrative.recommended_tests[0].reason, "r");
        assert!(narrative.relief_remedies.is_empty());
    }
}
