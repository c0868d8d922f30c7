//! Problem → specialty lookup operations.

use rusqlite::{params, Connection};

use super::{Database, DbResult};
use crate::models::ProblemSpecialtyMapping;

impl Database {
    /// Insert or update a lookup row.
    pub fn upsert_problem_mapping(&self, mapping: &ProblemSpecialtyMapping) -> DbResult<()> {
        insert_problem_mapping(&self.conn, mapping)
    }

    /// Distinct specialties whose problem phrase contains `token`.
    ///
    /// Case-insensitive substring match; a blank token matches nothing.
    pub fn specialties_containing(&self, token: &str) -> DbResult<Vec<String>> {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT DISTINCT specialty
            FROM problem_specialty_map
            WHERE instr(fold_case(problem), ?1) > 0
            ORDER BY specialty
            "#,
        )?;

        let rows = stmt.query_map([token], |row| row.get::<_, String>(0))?;

        let mut specialties = Vec::new();
        for row in rows {
            specialties.push(row?);
        }
        Ok(specialties)
    }

    /// Every lookup row, ordered by problem then specialty.
    pub fn list_problem_mappings(&self) -> DbResult<Vec<ProblemSpecialtyMapping>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT problem, specialty, confidence
            FROM problem_specialty_map
            ORDER BY problem, specialty
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(ProblemSpecialtyMapping {
                problem: row.get(0)?,
                specialty: row.get(1)?,
                confidence: row.get(2)?,
            })
        })?;

        let mut mappings = Vec::new();
        for row in rows {
            mappings.push(row?);
        }
        Ok(mappings)
    }
}

pub(super) fn insert_problem_mapping(
    conn: &Connection,
    mapping: &ProblemSpecialtyMapping,
) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO problem_specialty_map (problem, specialty, confidence)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(problem, specialty) DO UPDATE SET
            confidence = excluded.confidence
        "#,
        params![mapping.problem, mapping.specialty, mapping.confidence],
    )?;
    Ok(())
}
