//! Keyword extraction from free-text symptom descriptions.

use std::collections::BTreeSet;

/// Split text into its set of lowercase word tokens.
///
/// A word is a maximal run of alphanumeric characters or `_`. Everything
/// else separates words and is discarded. No stop words are removed and no
/// stemming is applied, so "headaches" and "headache" stay distinct.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
