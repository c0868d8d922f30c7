//! Narrative prompt construction.
//!
//! The prompt enumerates every recognised query field (absent ones as
//! "N/A"), caps the suggestion lists and asks for bare JSON.

use std::fmt::Write;

use kantan_core::models::{SymptomQuery, MAX_RECOMMENDED_TESTS, MAX_RELIEF_REMEDIES, MAX_SEVERITY};

/// Placeholder for fields the client did not fill.
pub const NOT_AVAILABLE: &str = "N/A";

/// Opening instruction of every narrative prompt.
pub const ASSISTANT_PREAMBLE: &str = "You are a medical triage assistant. \
You do not diagnose; you help a patient understand their symptoms before they see a doctor.";

/// Structured builder for the narrative prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativePrompt<'a> {
    description: &'a str,
    duration: Option<&'a str>,
    severity: Option<i32>,
    body_parts: &'a [String],
    context: &'a [String],
}

impl<'a> NarrativePrompt<'a> {
    /// Prompt for a query.
    pub fn from_query(query: &'a SymptomQuery) -> Self {
        Self {
            description: query.description.trim(),
            duration: query.effective_duration(),
            severity: query.effective_severity(),
            body_parts: &query.body_parts,
            context: &query.context,
        }
    }

    /// Render the prompt text.
    pub fn render(&self) -> String {
        let mut prompt = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(prompt, "{}", ASSISTANT_PREAMBLE);
        let _ = writeln!(prompt, "The patient reports:");
        let _ = writeln!(prompt, "- Symptom description: {}", or_na(Some(self.description)));
        let _ = writeln!(prompt, "- Duration: {}", or_na(self.duration));
        let _ = writeln!(
            prompt,
            "- Severity (1-{}): {}",
            MAX_SEVERITY,
            self.severity
                .map(|s| s.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        );
        let _ = writeln!(prompt, "- Body location: {}", join_or_na(self.body_parts));
        let _ = writeln!(prompt, "- Additional context: {}", join_or_na(self.context));
        let _ = writeln!(prompt);
        let _ = writeln!(
            prompt,
            "Respond with a JSON object with exactly these keys, suggesting at most {} tests and at most {} remedies:",
            MAX_RECOMMENDED_TESTS, MAX_RELIEF_REMEDIES
        );
        let _ = writeln!(
            prompt,
            r#"  "description": "only the problem keywords, suitable for a database lookup","#
        );
        let _ = writeln!(
            prompt,
            r#"  "diagnostic_summary": "two sentences on what the symptoms might indicate","#
        );
        let _ = writeln!(
            prompt,
            r#"  "recommended_tests": [{{"name": "Test name", "reason": "Why the test helps"}}],"#
        );
        let _ = writeln!(
            prompt,
            r#"  "relief_remedies": [{{"remedy": "Remedy name", "description": "How it helps"}}]"#
        );
        let _ = writeln!(prompt);
        prompt.push_str("Return ONLY valid JSON, no additional text.");

        prompt
    }
}

fn or_na(value: Option<&str>) -> &str {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
}

fn join_or_na(values: &[String]) -> String {
    let parts: Vec<&str> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();

    if parts.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        parts.join(", ")
    }
}
