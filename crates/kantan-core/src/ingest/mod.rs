//! Offline ingest: scraped directory records → normalized tables.
//!
//! ```text
//! DirectoryBundle (JSON)
//!   ├─ hospitals ─► clean name / infer type / clean address / city ─► locations + hospitals
//!   ├─ doctors ───► link by cleaned hospital name ────────────────► doctors
//!   └─ problem_map ► trim + lower-case + dedup ────────────────────► problem_specialty_map
//! ```
//!
//! Surrogate ids are assigned from 1 in first-seen order, so the same bundle
//! always produces the same tables.

mod districts;
mod normalize;

pub use districts::*;
pub use normalize::*;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::db::{Database, DbError, DirectoryCounts};
use crate::models::{Doctor, DirectorySnapshot, Hospital, Location, ProblemSpecialtyMapping};

/// Country recorded when none is configured.
pub const DEFAULT_COUNTRY: &str = "Nepal";

/// Ingest errors.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid bundle JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Bundle contains no usable records")]
    EmptyBundle,
}

pub type IngestResult<T> = Result<T, IngestError>;

/// Scraped records as produced by the directory scrapers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DirectoryBundle {
    #[serde(default)]
    pub hospitals: Vec<RawHospital>,
    #[serde(default)]
    pub doctors: Vec<RawDoctor>,
    #[serde(default)]
    pub problem_map: Vec<RawProblemMapping>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawHospital {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawDoctor {
    pub name: String,
    pub specialty: String,
    #[serde(default)]
    pub qualification: Option<String>,
    #[serde(default)]
    pub nmc_number: Option<String>,
    /// Hospital name as scraped; matched after cleaning
    #[serde(default)]
    pub hospital: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawProblemMapping {
    pub problem: String,
    pub specialty: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Summary of one normalization run.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct IngestReport {
    pub locations: usize,
    pub hospitals: usize,
    pub doctors: usize,
    pub problem_mappings: usize,
    /// Doctors whose hospital could not be found (stored without one)
    pub unlinked_doctors: usize,
    /// Records dropped for missing required fields
    pub skipped_records: usize,
    pub type_distribution: BTreeMap<String, usize>,
    pub district_distribution: BTreeMap<String, usize>,
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Locations:        {}", self.locations)?;
        writeln!(f, "Hospitals:        {}", self.hospitals)?;
        writeln!(f, "Doctors:          {}", self.doctors)?;
        writeln!(f, "Problem mappings: {}", self.problem_mappings)?;
        writeln!(f, "Unlinked doctors: {}", self.unlinked_doctors)?;
        writeln!(f, "Skipped records:  {}", self.skipped_records)?;

        writeln!(f, "\nType distribution:")?;
        for (hospital_type, count) in &self.type_distribution {
            writeln!(f, "  {:<20} {}", hospital_type, count)?;
        }

        writeln!(f, "\nDistrict distribution:")?;
        for (district, count) in &self.district_distribution {
            writeln!(f, "  {:<20} {}", district, count)?;
        }
        Ok(())
    }
}

/// Read a bundle from a JSON file.
pub fn load_bundle<P: AsRef<Path>>(path: P) -> IngestResult<DirectoryBundle> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Normalize a bundle into directory tables.
pub fn normalize_bundle(
    bundle: &DirectoryBundle,
    country: &str,
) -> IngestResult<(DirectorySnapshot, IngestReport)> {
    let country = match country.trim() {
        "" => DEFAULT_COUNTRY.to_string(),
        c => title_case(c),
    };

    let mut snapshot = DirectorySnapshot::default();
    let mut report = IngestReport::default();

    // (city, country) → location id
    let mut location_ids: HashMap<(String, String), i64> = HashMap::new();
    // (name, type, address, location_id) → hospital id
    let mut hospital_keys: HashMap<(String, String, Option<String>, Option<i64>), i64> =
        HashMap::new();
    // cleaned name → first hospital id with that name
    let mut hospitals_by_name: HashMap<String, i64> = HashMap::new();

    for raw in &bundle.hospitals {
        let Some(name) = clean_hospital_name(&raw.name) else {
            warn!(name = %raw.name, "Skipping hospital without a usable name");
            report.skipped_records += 1;
            continue;
        };
        let hospital_type = infer_hospital_type(&name).as_str().to_string();
        let address = raw.address.as_deref().and_then(clean_address);

        let location_id = raw.address.as_deref().and_then(extract_city).map(|city| {
            let key = (city.clone(), country.clone());
            let next_id = location_ids.len() as i64 + 1;
            *location_ids.entry(key).or_insert_with(|| {
                let district = district_for_city(&city).to_string();
                *report.district_distribution.entry(district.clone()).or_default() += 1;
                snapshot.locations.push(Location {
                    id: next_id,
                    city,
                    district,
                    country: country.clone(),
                });
                next_id
            })
        });

        let key = (name.clone(), hospital_type.clone(), address.clone(), location_id);
        if hospital_keys.contains_key(&key) {
            continue;
        }

        let id = snapshot.hospitals.len() as i64 + 1;
        hospital_keys.insert(key, id);
        hospitals_by_name.entry(name.clone()).or_insert(id);
        *report.type_distribution.entry(hospital_type.clone()).or_default() += 1;

        snapshot.hospitals.push(Hospital {
            id,
            name,
            hospital_type,
            address,
            location_id,
        });
    }

    for raw in &bundle.doctors {
        let name = raw.name.trim();
        let specialty = raw.specialty.trim().to_lowercase();
        if name.is_empty() || specialty.is_empty() {
            warn!(name = %raw.name, "Skipping doctor without name or specialty");
            report.skipped_records += 1;
            continue;
        }

        let hospital_id = raw
            .hospital
            .as_deref()
            .and_then(clean_hospital_name)
            .and_then(|h| hospitals_by_name.get(&h).copied());
        if hospital_id.is_none() {
            report.unlinked_doctors += 1;
        }

        snapshot.doctors.push(Doctor {
            id: snapshot.doctors.len() as i64 + 1,
            name: name.to_string(),
            specialty,
            qualification: non_blank(raw.qualification.as_deref()),
            nmc_number: non_blank(raw.nmc_number.as_deref()),
            hospital_id,
        });
    }

    let mut seen_pairs = HashSet::new();
    for raw in &bundle.problem_map {
        let problem = raw.problem.trim().to_lowercase();
        let specialty = raw.specialty.trim().to_lowercase();
        if problem.is_empty() || specialty.is_empty() {
            report.skipped_records += 1;
            continue;
        }
        if !seen_pairs.insert((problem.clone(), specialty.clone())) {
            continue;
        }

        let confidence = match raw.confidence {
            Some(c) if (0.0..=1.0).contains(&c) => Some(c),
            Some(c) => {
                warn!(%problem, %specialty, confidence = c, "Dropping out-of-range confidence");
                None
            }
            None => None,
        };

        snapshot.problem_map.push(ProblemSpecialtyMapping {
            problem,
            specialty,
            confidence,
        });
    }

    if snapshot.hospitals.is_empty() && snapshot.doctors.is_empty() && snapshot.problem_map.is_empty()
    {
        return Err(IngestError::EmptyBundle);
    }

    report.locations = snapshot.locations.len();
    report.hospitals = snapshot.hospitals.len();
    report.doctors = snapshot.doctors.len();
    report.problem_mappings = snapshot.problem_map.len();

    info!(
        locations = report.locations,
        hospitals = report.hospitals,
        doctors = report.doctors,
        problem_mappings = report.problem_mappings,
        unlinked_doctors = report.unlinked_doctors,
        skipped = report.skipped_records,
        "Normalized directory bundle"
    );

    Ok((snapshot, report))
}

/// Replace the stored directory with a normalized snapshot.
pub fn write_snapshot(db: &mut Database, snapshot: &DirectorySnapshot) -> IngestResult<DirectoryCounts> {
    let counts = db.replace_directory(snapshot)?;
    info!(
        locations = counts.locations,
        hospitals = counts.hospitals,
        doctors = counts.doctors,
        problem_mappings = counts.problem_mappings,
        "Directory replaced"
    );
    Ok(counts)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
