//! Problem text → specialty set.

use tracing::debug;

use crate::db::Database;
use crate::models::ResolvedSpecialtySet;

use super::{extract_keywords, ResolverResult, SpecialtyMatcher};

/// Resolves problem text to a non-empty set of specialties.
pub struct SpecialtyResolver<'a> {
    db: &'a Database,
    matcher: &'a dyn SpecialtyMatcher,
}

impl<'a> SpecialtyResolver<'a> {
    pub fn new(db: &'a Database, matcher: &'a dyn SpecialtyMatcher) -> Self {
        Self { db, matcher }
    }

    /// Resolve problem text to specialties.
    ///
    /// Falls back to the general physician when no token matches, including
    /// when the text has no tokens at all.
    pub fn resolve(&self, problem_text: &str) -> ResolverResult<ResolvedSpecialtySet> {
        let tokens = extract_keywords(problem_text);
        let matched = self.matcher.match_tokens(self.db, &tokens)?;
        let specialties = ResolvedSpecialtySet::from_matches(&matched);

        debug!(
            matcher = self.matcher.name(),
            tokens = tokens.len(),
            specialties = ?specialties.to_vec(),
            fallback = specialties.is_fallback(),
            "Resolved specialties"
        );

        Ok(specialties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProblemSpecialtyMapping, DEFAULT_SPECIALTY};
    use crate::resolver::SubstringMatcher;

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.upsert_problem_mapping(&ProblemSpecialtyMapping::new("headache", "neurologist", Some(0.9)))
            .unwrap();
        db.upsert_problem_mapping(&ProblemSpecialtyMapping::new(
            "nausea",
            "gastroenterologist",
            Some(0.7),
        ))
        .unwrap();
        db.upsert_problem_mapping(&ProblemSpecialtyMapping::new("migraine headache", "Neurologist", None))
            .unwrap();
        db
    }

    #[test]
    fn test_resolve_union() {
        let db = setup_db();
        let resolver = SpecialtyResolver::new(&db, &SubstringMatcher);

        let specialties = resolver.resolve("severe headache and nausea").unwrap();
        assert_eq!(specialties.to_vec(), vec!["gastroenterologist", "neurologist"]);
    }

    #[test]
    fn test_resolve_case_variants_collapse() {
        let db = setup_db();
        let resolver = SpecialtyResolver::new(&db, &SubstringMatcher);

        // "neurologist" and "Neurologist" rows are one specialty
        let specialties = resolver.resolve("HEADACHE").unwrap();
        assert_eq!(specialties.to_vec(), vec!["neurologist"]);
    }

    #[test]
    fn test_resolve_fallback() {
        let db = setup_db();
        let resolver = SpecialtyResolver::new(&db, &SubstringMatcher);

        for text in ["xyzzy unknown symptom", "", "   ", "!!!"] {
            let specialties = resolver.resolve(text).unwrap();
            assert!(specialties.is_fallback(), "expected fallback for {:?}", text);
            assert!(specialties.contains(DEFAULT_SPECIALTY));
        }
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let db = setup_db();
        let resolver = SpecialtyResolver::new(&db, &SubstringMatcher);

        let first = resolver.resolve("nausea after a headache").unwrap();
        let second = resolver.resolve("nausea after a headache").unwrap();
        assert_eq!(first, second);
    }
}
