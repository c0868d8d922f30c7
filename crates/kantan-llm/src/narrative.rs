//! Narrative parsing from model output.

use kantan_core::models::EnrichedNarrative;
use thiserror::Error;
use tracing::warn;

/// Narrative parse errors.
#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

pub type NarrativeResult<T> = Result<T, NarrativeError>;

/// Strictly parse model output into a bounded narrative.
///
/// Text around the outermost JSON object (prose, code fences) is ignored.
pub fn try_parse_narrative(output: &str) -> NarrativeResult<EnrichedNarrative> {
    let json_start = output.find('{').ok_or_else(|| {
        NarrativeError::InvalidFormat("No JSON object found in response".into())
    })?;
    let json_end = output.rfind('}').ok_or_else(|| {
        NarrativeError::InvalidFormat("No closing brace found in response".into())
    })?;
    if json_end < json_start {
        return Err(NarrativeError::InvalidFormat(
            "Closing brace precedes opening brace".into(),
        ));
    }

    let narrative: EnrichedNarrative = serde_json::from_str(&output[json_start..=json_end])?;
    Ok(narrative.bounded())
}

/// Parse model output, substituting the neutral narrative on any failure.
pub fn parse_narrative(output: &str) -> EnrichedNarrative {
    match try_parse_narrative(output) {
        Ok(narrative) => narrative,
        Err(e) => {
            warn!(error = %e, "Unparseable narrative, using neutral fallback");
            EnrichedNarrative::neutral()
        }
    }
}
