//! Token → specialty matching strategies.
//!
//! Two strategies are available:
//! - `SubstringMatcher`: a token matches a lookup row when it occurs anywhere
//!   inside the problem phrase (case-insensitive). Permissive: "a" matches
//!   nearly everything.
//! - `FuzzyMatcher`: a token matches when it is similar enough to the phrase
//!   or one of its words, which tolerates misspellings like "headahce".

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strsim::{jaro_winkler, normalized_levenshtein};

use crate::db::Database;
use crate::models::ProblemSpecialtyMapping;

use super::ResolverResult;

/// Default similarity threshold for fuzzy matching.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.85;

/// Maps extracted tokens to the specialties of matching lookup rows.
pub trait SpecialtyMatcher: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Union of the specialties matched by every token.
    fn match_tokens(
        &self,
        db: &Database,
        tokens: &BTreeSet<String>,
    ) -> ResolverResult<BTreeSet<String>>;
}

/// Which matcher to build.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchingAlgorithm {
    #[default]
    Substring,
    Fuzzy,
}

impl MatchingAlgorithm {
    /// Build the matcher for this algorithm.
    pub fn build(self, fuzzy_threshold: f64) -> Box<dyn SpecialtyMatcher> {
        match self {
            MatchingAlgorithm::Substring => Box::new(SubstringMatcher),
            MatchingAlgorithm::Fuzzy => Box::new(FuzzyMatcher::new(fuzzy_threshold)),
        }
    }
}

/// Case-insensitive substring containment, evaluated in the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl SpecialtyMatcher for SubstringMatcher {
    fn name(&self) -> &'static str {
        "substring"
    }

    fn match_tokens(
        &self,
        db: &Database,
        tokens: &BTreeSet<String>,
    ) -> ResolverResult<BTreeSet<String>> {
        let mut specialties = BTreeSet::new();
        for token in tokens {
            specialties.extend(db.specialties_containing(token)?);
        }
        Ok(specialties)
    }
}

/// Similarity-based matching against every lookup row.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZY_THRESHOLD)
    }
}

impl FuzzyMatcher {
    /// Create a matcher accepting scores at or above `threshold` (0.0 - 1.0).
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Best similarity between a token and a problem phrase (0.0 - 1.0).
    ///
    /// Containment scores 1.0, so every substring match is also a fuzzy match.
    fn score(token: &str, mapping: &ProblemSpecialtyMapping) -> f64 {
        let problem = mapping.problem.to_lowercase();
        if problem.contains(token) {
            return 1.0;
        }

        problem
            .split_whitespace()
            .map(|word| fuzzy_match(token, word))
            .fold(fuzzy_match(token, &problem), f64::max)
    }
}

impl SpecialtyMatcher for FuzzyMatcher {
    fn name(&self) -> &'static str {
        "fuzzy"
    }

    fn match_tokens(
        &self,
        db: &Database,
        tokens: &BTreeSet<String>,
    ) -> ResolverResult<BTreeSet<String>> {
        if tokens.is_empty() {
            return Ok(BTreeSet::new());
        }

        let mappings = db.list_problem_mappings()?;
        let mut specialties = BTreeSet::new();

        for token in tokens {
            let token = token.trim().to_lowercase();
            if token.is_empty() {
                continue;
            }
            for mapping in &mappings {
                if Self::score(&token, mapping) >= self.threshold {
                    specialties.insert(mapping.specialty.clone());
                }
            }
        }

        Ok(specialties)
    }
}

/// Compute fuzzy string similarity using combined metrics.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    // Jaro-Winkler favours shared prefixes; Levenshtein covers overall edits
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);

    jw * 0.6 + lev * 0.4
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        for (problem, specialty) in [
            ("headache", "neurologist"),
            ("nausea", "gastroenterologist"),
            ("chest pain", "cardiologist"),
            ("skin rash", "dermatologist"),
        ] {
            db.upsert_problem_mapping(&ProblemSpecialtyMapping::new(problem, specialty, None))
                .unwrap();
        }
        db
    }

    fn tokens(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_substring_union() {
        let db = setup_db();
        let matched = SubstringMatcher
            .match_tokens(&db, &tokens(&["headache", "nausea", "severe"]))
            .unwrap();

        assert_eq!(matched, tokens(&["gastroenterologist", "neurologist"]));
    }

    #[test]
    fn test_substring_no_tokens() {
        let db = setup_db();
        assert!(SubstringMatcher
            .match_tokens(&db, &BTreeSet::new())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_fuzzy_tolerates_typos() {
        let db = setup_db();
        let matcher = FuzzyMatcher::default();

        // Substring misses the misspelling, fuzzy does not
        let typo = tokens(&["headahce"]);
        assert!(SubstringMatcher.match_tokens(&db, &typo).unwrap().is_empty());
        assert_eq!(
            matcher.match_tokens(&db, &typo).unwrap(),
            tokens(&["neurologist"])
        );
    }

    #[test]
    fn test_fuzzy_includes_substring_matches() {
        let db = setup_db();
        let input = tokens(&["chest", "rash"]);

        let substring = SubstringMatcher.match_tokens(&db, &input).unwrap();
        let fuzzy = FuzzyMatcher::default().match_tokens(&db, &input).unwrap();
        assert!(substring.is_subset(&fuzzy));
    }

    #[test]
    fn test_matchers_agree_on_non_ascii_case() {
        let db = setup_db();
        db.upsert_problem_mapping(&ProblemSpecialtyMapping::new(
            "ÉRUPTION CUTANÉE",
            "dermatologist",
            None,
        ))
        .unwrap();
        let input = tokens(&["éruption"]);

        let substring = SubstringMatcher.match_tokens(&db, &input).unwrap();
        let fuzzy = FuzzyMatcher::new(0.99).match_tokens(&db, &input).unwrap();
        assert_eq!(substring, tokens(&["dermatologist"]));
        assert_eq!(substring, fuzzy);
    }

    #[test]
    fn test_fuzzy_rejects_unrelated() {
        let db = setup_db();
        let matched = FuzzyMatcher::default()
            .match_tokens(&db, &tokens(&["xyzzy"]))
            .unwrap();
        assert!(matched.is_empty());
    }

    #[test]
    fn test_fuzzy_match_scores() {
        assert!(fuzzy_match("headache", "headache") > 0.99);
        assert!(fuzzy_match("headache", "headahce") > 0.85);
        assert!(fuzzy_match("headache", "nausea") < 0.6);
    }

    #[test]
    fn test_algorithm_build() {
        assert_eq!(MatchingAlgorithm::Substring.build(0.9).name(), "substring");
        assert_eq!(MatchingAlgorithm::Fuzzy.build(0.9).name(), "fuzzy");
        assert_eq!(MatchingAlgorithm::default(), MatchingAlgorithm::Substring);
    }
}
