//! Provider directory models.

use serde::{Deserialize, Serialize};

/// A physical location referenced by hospitals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    /// Surrogate key assigned by the ingest pipeline
    pub id: i64,
    pub city: String,
    /// Administrative district ("Unknown" when the city is not mapped)
    pub district: String,
    pub country: String,
}

/// A hospital, clinic or diagnostic center.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hospital {
    /// Surrogate key assigned by the ingest pipeline
    pub id: i64,
    /// Cleaned display name (corporate suffixes stripped)
    pub name: String,
    /// Facility type, e.g. "HOSPITAL", "CLINIC", "DIAGNOSTIC CENTER"
    pub hospital_type: String,
    /// Cleaned street address
    pub address: Option<String>,
    /// Location reference. Hospitals without one never appear in matches.
    pub location_id: Option<i64>,
}

/// A doctor practising at (at most) one hospital.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    /// Specialty name. Must agree case-insensitively with `ProblemSpecialtyMapping::specialty`.
    pub specialty: String,
    pub qualification: Option<String>,
    /// Medical council registration number
    pub nmc_number: Option<String>,
    pub hospital_id: Option<i64>,
}

/// One row of the problem → specialty lookup table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProblemSpecialtyMapping {
    /// Curated problem phrase (e.g. "chest pain")
    pub problem: String,
    /// Specialty the phrase maps to (e.g. "cardiologist")
    pub specialty: String,
    pub confidence: Option<f64>,
}

impl ProblemSpecialtyMapping {
    pub fn new(problem: &str, specialty: &str, confidence: Option<f64>) -> Self {
        Self {
            problem: problem.to_string(),
            specialty: specialty.to_string(),
            confidence,
        }
    }
}

/// A complete normalized directory, as written by the ingest pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DirectorySnapshot {
    pub locations: Vec<Location>,
    pub hospitals: Vec<Hospital>,
    pub doctors: Vec<Doctor>,
    pub problem_map: Vec<ProblemSpecialtyMapping>,
}

/// Facility classification inferred from a hospital name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HospitalType {
    Hospital,
    Clinic,
    DiagnosticCenter,
}

impl HospitalType {
    /// Storage/display form written to `hospitals.type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            HospitalType::Hospital => "HOSPITAL",
            HospitalType::Clinic => "CLINIC",
            HospitalType::DiagnosticCenter => "DIAGNOSTIC CENTER",
        }
    }
}

impl std::fmt::Display for HospitalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
