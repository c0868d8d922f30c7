//! Golden tests for specialty resolution and provider matching.
//!
//! Each case seeds a fresh in-memory directory and checks the resolved
//! specialties for one symptom text.

use std::sync::Arc;

use kantan_core::db::{Database, Store};
use kantan_core::models::{Doctor, Hospital, Location, ProblemSpecialtyMapping, SymptomQuery};
use kantan_core::resolver::{ProviderMatcher, SpecialtyResolver, SubstringMatcher};
use kantan_core::triage::{Enrichment, TriagePipeline};

type Mapping = (&'static str, &'static str, Option<f64>);

/// Test case from the golden table.
struct GoldenCase {
    id: &'static str,
    mappings: &'static [Mapping],
    text: &'static str,
    expected_specialties: &'static [&'static str],
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "headache-and-nausea",
            mappings: &[
                ("headache", "neurologist", Some(0.9)),
                ("nausea", "gastroenterologist", Some(0.7)),
            ],
            text: "severe headache and nausea",
            expected_specialties: &["gastroenterologist", "neurologist"],
        },
        GoldenCase {
            id: "unknown-symptom",
            mappings: &[],
            text: "xyzzy unknown symptom",
            expected_specialties: &["general physician"],
        },
        GoldenCase {
            id: "unknown-symptom-with-table",
            mappings: &[("headache", "neurologist", Some(0.9))],
            text: "xyzzy",
            expected_specialties: &["general physician"],
        },
        GoldenCase {
            id: "empty-text",
            mappings: &[("headache", "neurologist", Some(0.9))],
            text: "   ",
            expected_specialties: &["general physician"],
        },
        GoldenCase {
            id: "punctuation-only",
            mappings: &[("headache", "neurologist", Some(0.9))],
            text: "?!...",
            expected_specialties: &["general physician"],
        },
        GoldenCase {
            id: "partial-token",
            mappings: &[("chest pain", "cardiologist", None)],
            text: "Pain in my chest!",
            expected_specialties: &["cardiologist"],
        },
        GoldenCase {
            id: "one-phrase-many-specialties",
            mappings: &[
                ("back pain", "orthopedic surgeon", Some(0.8)),
                ("back pain", "physiotherapist", Some(0.6)),
            ],
            text: "lower back",
            expected_specialties: &["orthopedic surgeon", "physiotherapist"],
        },
        GoldenCase {
            id: "mixed-case-specialty",
            mappings: &[("Skin Rash", "Dermatologist", None)],
            text: "RASH",
            expected_specialties: &["dermatologist"],
        },
    ]
}

fn seed_mappings(db: &Database, mappings: &[Mapping]) {
    for (problem, specialty, confidence) in mappings {
        db.upsert_problem_mapping(&ProblemSpecialtyMapping::new(problem, specialty, *confidence))
            .unwrap();
    }
}

#[test]
fn test_golden_cases() {
    for case in get_golden_cases() {
        let db = Database::open_in_memory().unwrap();
        seed_mappings(&db, case.mappings);

        let specialties = SpecialtyResolver::new(&db, &SubstringMatcher)
            .resolve(case.text)
            .unwrap();

        assert_eq!(
            specialties.to_vec(),
            case.expected_specialties,
            "Case {}: specialty mismatch",
            case.id
        );
    }
}

/// Two cardiologists at one hospital.
fn seed_shared_hospital(db: &Database) {
    seed_mappings(db, &[("chest pain", "cardiologist", Some(0.95))]);
    db.insert_location(&Location {
        id: 1,
        city: "Kathmandu".into(),
        district: "Kathmandu".into(),
        country: "Nepal".into(),
    })
    .unwrap();
    db.insert_hospital(&Hospital {
        id: 1,
        name: "Shahid Gangalal National Heart Centre".into(),
        hospital_type: "HOSPITAL".into(),
        address: Some("Bansbari".into()),
        location_id: Some(1),
    })
    .unwrap();
    for (id, name) in [(1, "Dr. Sharma"), (2, "Dr. Poudel")] {
        db.insert_doctor(&Doctor {
            id,
            name: name.into(),
            specialty: "Cardiologist".into(),
            qualification: Some("DM Cardiology".into()),
            nmc_number: None,
            hospital_id: Some(1),
        })
        .unwrap();
    }
}

#[test]
fn test_shared_hospital_yields_one_clinic() {
    let db = Database::open_in_memory().unwrap();
    seed_shared_hospital(&db);

    let specialties = SpecialtyResolver::new(&db, &SubstringMatcher)
        .resolve("chest pain")
        .unwrap();
    let result = ProviderMatcher::new(&db)
        .match_providers(&specialties, None)
        .unwrap();

    let doctors: Vec<&str> = result.doctors.iter().map(|d| d.doctor_name.as_str()).collect();
    assert_eq!(doctors, vec!["Dr. Sharma", "Dr. Poudel"]);
    assert_eq!(result.clinics.len(), 1);
    assert_eq!(result.clinics[0].name, "Shahid Gangalal National Heart Centre");
    assert_eq!(result.clinics[0].location, "Bansbari, Nepal");
    assert_eq!(result.clinics[0].services, vec!["HOSPITAL"]);
}

#[test]
fn test_pipeline_end_to_end() {
    let store = Store::open_in_memory().unwrap();
    seed_shared_hospital(&store.acquire().unwrap());

    let pipeline = TriagePipeline::new(store, Arc::new(SubstringMatcher));
    let mut query = SymptomQuery::new("crushing chest pain");
    query.severity = Some(9);

    let response = pipeline.run(&query, &Enrichment::Disabled).unwrap();
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["keywords"], serde_json::json!(["cardiologist"]));
    assert_eq!(json["diagnostic_alert"]["severity"], "Moderate");
    assert_eq!(json["diagnostic_alert"]["contagious"], false);
    assert_eq!(json["recommended_doctors"].as_array().unwrap().len(), 2);
    assert_eq!(json["nearby_clinics"][0]["location"], "Bansbari, Nepal");
    assert_eq!(json["recommended_tests"], serde_json::json!([]));
    assert_eq!(
        json["risk_flags"],
        serde_json::json!(["HIGH_SEVERITY", "EMERGENCY"])
    );
}
