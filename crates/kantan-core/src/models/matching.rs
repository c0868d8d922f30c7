//! Specialty resolution and provider matching models.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Specialty used when no lookup row matches.
pub const DEFAULT_SPECIALTY: &str = "general physician";

/// Service listed for clinics whose facility type is blank.
pub const DEFAULT_CLINIC_SERVICE: &str = "OPD";

/// Non-empty, deduplicated set of lowercase specialty names.
///
/// The only constructors either take matched specialties (falling back to
/// [`DEFAULT_SPECIALTY`]) or the default itself, so an empty set never exists.
/// Deserialization goes through the same path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "BTreeSet<String>", into = "BTreeSet<String>")]
pub struct ResolvedSpecialtySet(BTreeSet<String>);

impl From<BTreeSet<String>> for ResolvedSpecialtySet {
    fn from(matches: BTreeSet<String>) -> Self {
        Self::from_matches(matches)
    }
}

impl From<ResolvedSpecialtySet> for BTreeSet<String> {
    fn from(set: ResolvedSpecialtySet) -> Self {
        set.0
    }
}

impl ResolvedSpecialtySet {
    /// Build from matched specialty names.
    ///
    /// Names are trimmed and lower-cased; blank names are dropped. Falls back
    /// to the default specialty when nothing remains.
    pub fn from_matches<I, S>(matches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = matches
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        if set.is_empty() {
            Self::fallback()
        } else {
            Self(set)
        }
    }

    /// The singleton default set.
    pub fn fallback() -> Self {
        Self(BTreeSet::from([DEFAULT_SPECIALTY.to_string()]))
    }

    /// True when this is exactly the default set.
    pub fn is_fallback(&self) -> bool {
        self.0.len() == 1 && self.0.contains(DEFAULT_SPECIALTY)
    }

    pub fn contains(&self, specialty: &str) -> bool {
        self.0.contains(&specialty.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate specialties in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Sorted specialty names.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

/// One decoded row of the doctor ⋈ hospital ⋈ location join.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ProviderRow {
    pub doctor_name: String,
    pub specialty: String,
    pub qualification: Option<String>,
    pub hospital_name: String,
    pub hospital_type: Option<String>,
    pub hospital_address: Option<String>,
    pub city: String,
    pub district: String,
    pub country: String,
}

/// Doctor entry returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoctorView {
    pub doctor_name: String,
    pub specialty: String,
    pub qualification: Option<String>,
    pub hospital_name: String,
    pub city: String,
    pub district: String,
    pub country: String,
}

impl From<&ProviderRow> for DoctorView {
    fn from(row: &ProviderRow) -> Self {
        Self {
            doctor_name: row.doctor_name.clone(),
            specialty: row.specialty.clone(),
            qualification: row.qualification.clone(),
            hospital_name: row.hospital_name.clone(),
            city: row.city.clone(),
            district: row.district.clone(),
            country: row.country.clone(),
        }
    }
}

/// Clinic entry returned to the caller, one per hospital name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClinicView {
    pub name: String,
    /// Address and country joined by ", " (city intentionally omitted)
    pub location: String,
    pub services: Vec<String>,
}

impl From<&ProviderRow> for ClinicView {
    fn from(row: &ProviderRow) -> Self {
        let location = [row.hospital_address.as_deref(), Some(row.country.as_str())]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        let services = match row.hospital_type.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => vec![t.to_string()],
            _ => vec![DEFAULT_CLINIC_SERVICE.to_string()],
        };

        Self {
            name: row.hospital_name.clone(),
            location,
            services,
        }
    }
}

/// Output of the provider matcher.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchResult {
    pub doctors: Vec<DoctorView>,
    pub clinics: Vec<ClinicView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(address: Option<&str>, hospital_type: Option<&str>) -> ProviderRow {
        ProviderRow {
            doctor_name: "Dr. Sharma".into(),
            specialty: "cardiologist".into(),
            qualification: Some("MD".into()),
            hospital_name: "Bir Hospital".into(),
            hospital_type: hospital_type.map(Into::into),
            hospital_address: address.map(Into::into),
            city: "Kathmandu".into(),
            district: "Kathmandu".into(),
            country: "Nepal".into(),
        }
    }

    #[test]
    fn test_empty_matches_fall_back() {
        let set = ResolvedSpecialtySet::from_matches(Vec::<String>::new());
        assert!(set.is_fallback());
        assert_eq!(set.to_vec(), vec![DEFAULT_SPECIALTY]);
    }

    #[test]
    fn test_deserialize_keeps_set_non_empty() {
        let set: ResolvedSpecialtySet = serde_json::from_str("[]").unwrap();
        assert!(set.is_fallback());

        let set: ResolvedSpecialtySet = serde_json::from_str(r#"["Cardiologist"]"#).unwrap();
        assert_eq!(set.to_vec(), vec!["cardiologist"]);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["cardiologist"]"#);
    }

    #[test]
    fn test_blank_matches_fall_back() {
        let set = ResolvedSpecialtySet::from_matches(["", "   "]);
        assert!(set.is_fallback());
    }

    #[test]
    fn test_matches_are_normalized_and_deduplicated() {
        let set = ResolvedSpecialtySet::from_matches(["Neurologist", "neurologist ", "ENT"]);
        assert_eq!(set.to_vec(), vec!["ent", "neurologist"]);
        assert!(set.contains("NEUROLOGIST"));
        assert!(!set.is_fallback());
    }

    #[test]
    fn test_serializes_as_array() {
        let set = ResolvedSpecialtySet::from_matches(["b", "a"]);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn test_clinic_location_skips_city_and_blanks() {
        let clinic = ClinicView::from(&row(Some("Mahaboudha"), Some("HOSPITAL")));
        assert_eq!(clinic.location, "Mahaboudha, Nepal");
        assert_eq!(clinic.services, vec!["HOSPITAL"]);

        let clinic = ClinicView::from(&row(Some(""), Some("CLINIC")));
        assert_eq!(clinic.location, "Nepal");

        let clinic = ClinicView::from(&row(None, None));
        assert_eq!(clinic.location, "Nepal");
    }

    #[test]
    fn test_clinic_services_default_to_opd() {
        assert_eq!(ClinicView::from(&row(None, None)).services, vec!["OPD"]);
        assert_eq!(ClinicView::from(&row(None, Some(" "))).services, vec!["OPD"]);
    }
}
