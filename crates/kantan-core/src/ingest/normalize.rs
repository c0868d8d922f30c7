//! Text cleaning for scraped directory records.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::HospitalType;

/// Corporate suffixes dropped from hospital names.
static CORPORATE_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:private\s+limited|pvt|ltd)\b\.?").expect("corporate suffix pattern")
});

/// Standalone numbers such as ward numbers ("-4", "35").
static STANDALONE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\b").expect("standalone number pattern"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Runs of commas with optional whitespace around them.
static COMMA_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,(?:\s*,)*\s*").expect("comma run pattern"));

/// Clean a scraped hospital name.
///
/// "NORVIC INTERNATIONAL HOSPITAL PVT. LTD." → "Norvic International Hospital".
/// Returns `None` when nothing is left.
pub fn clean_hospital_name(raw: &str) -> Option<String> {
    let lower = raw.to_lowercase();
    let stripped = CORPORATE_SUFFIX_RE.replace_all(&lower, " ");
    let collapsed = collapse_whitespace(&stripped);
    let trimmed = collapsed.trim_matches(|c: char| c == ',' || c == '.' || c.is_whitespace());

    if trimmed.is_empty() {
        None
    } else {
        Some(title_case(trimmed))
    }
}

/// Infer the facility type from a (cleaned) name.
///
/// "hospital" wins over "clinic", which wins over diagnostic keywords.
/// Names with none of these are treated as clinics.
pub fn infer_hospital_type(name: &str) -> HospitalType {
    let lower = name.to_lowercase();

    if lower.contains("hospital") {
        HospitalType::Hospital
    } else if lower.contains("clinic") {
        // Also covers "polyclinic"
        HospitalType::Clinic
    } else if ["diagnostic", "pathology", "lab"]
        .iter()
        .any(|k| lower.contains(k))
    {
        HospitalType::DiagnosticCenter
    } else {
        HospitalType::Clinic
    }
}

/// Clean a scraped street address.
///
/// Drops ward numbers, turns hyphens into spaces, and tidies commas:
/// "Kalopul-4, , Kathmandu 44600" → "Kalopul, Kathmandu".
pub fn clean_address(raw: &str) -> Option<String> {
    let lower = raw.to_lowercase();
    let without_numbers = STANDALONE_NUMBER_RE.replace_all(&lower, "");
    let dehyphenated = without_numbers.replace('-', " ");
    let collapsed = collapse_whitespace(&dehyphenated);
    let commas = COMMA_RUN_RE.replace_all(&collapsed, ", ");
    let trimmed = commas.trim_matches(|c: char| c == ',' || c.is_whitespace());

    if trimmed.is_empty() {
        None
    } else {
        Some(title_case(trimmed))
    }
}

/// City taken from the last non-empty comma-separated segment of the raw address.
///
/// "Maharajgunj, Kathmandu-3" → "Kathmandu".
pub fn extract_city(raw_address: &str) -> Option<String> {
    let last = raw_address
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .last()?;

    let without_digits: String = last.chars().filter(|c| !c.is_ascii_digit()).collect();
    let collapsed = collapse_whitespace(&without_digits);
    let city = collapsed.trim_matches(|c: char| c == '-' || c.is_whitespace());

    if city.is_empty() {
        None
    } else {
        Some(title_case(city))
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }

    out
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}
