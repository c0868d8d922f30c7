//! SQLite schema definition.

/// Complete database schema for the provider directory and specialty lookup.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Locations
-- ============================================================================

CREATE TABLE IF NOT EXISTS locations (
    id INTEGER PRIMARY KEY,
    city TEXT NOT NULL,
    district TEXT NOT NULL DEFAULT 'Unknown',
    country TEXT NOT NULL,
    UNIQUE (city, country)
);

CREATE INDEX IF NOT EXISTS idx_locations_district ON locations(district);

-- ============================================================================
-- Hospitals
-- ============================================================================

CREATE TABLE IF NOT EXISTS hospitals (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    type TEXT,                                   -- HOSPITAL, CLINIC, DIAGNOSTIC CENTER
    address TEXT,
    location_id INTEGER REFERENCES locations(id)
);

CREATE INDEX IF NOT EXISTS idx_hospitals_location ON hospitals(location_id);
CREATE INDEX IF NOT EXISTS idx_hospitals_name ON hospitals(name);

-- ============================================================================
-- Doctors
-- ============================================================================

CREATE TABLE IF NOT EXISTS doctors (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    specialty TEXT NOT NULL,                     -- joined case-insensitively against problem_specialty_map
    qualification TEXT,
    nmc_number TEXT,
    hospital_id INTEGER REFERENCES hospitals(id)
);

CREATE INDEX IF NOT EXISTS idx_doctors_specialty ON doctors(specialty);
CREATE INDEX IF NOT EXISTS idx_doctors_hospital ON doctors(hospital_id);

-- ============================================================================
-- Problem → Specialty lookup (many-to-many)
-- ============================================================================

CREATE TABLE IF NOT EXISTS problem_specialty_map (
    problem TEXT NOT NULL,
    specialty TEXT NOT NULL,
    confidence REAL CHECK (confidence IS NULL OR (confidence >= 0.0 AND confidence <= 1.0)),
    PRIMARY KEY (problem, specialty)
);

CREATE INDEX IF NOT EXISTS idx_problem_map_specialty ON problem_specialty_map(specialty);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_hospital_location_foreign_key() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        // Unknown location should fail
        let result = conn.execute(
            "INSERT INTO hospitals (id, name, location_id) VALUES (1, 'Bir Hospital', 99)",
            [],
        );
        assert!(result.is_err());

        conn.execute(
            "INSERT INTO locations (id, city, district, country) VALUES (1, 'Kathmandu', 'Kathmandu', 'Nepal')",
            [],
        )
        .unwrap();
        let result = conn.execute(
            "INSERT INTO hospitals (id, name, location_id) VALUES (1, 'Bir Hospital', 1)",
            [],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_confidence_range_check() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO problem_specialty_map (problem, specialty, confidence) VALUES ('headache', 'neurologist', 1.5)",
            [],
        );
        assert!(result.is_err());

        let result = conn.execute(
            "INSERT INTO problem_specialty_map (problem, specialty, confidence) VALUES ('headache', 'neurologist', NULL)",
            [],
        );
        assert!(result.is_ok());
    }
}
