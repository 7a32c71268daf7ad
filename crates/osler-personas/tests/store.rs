use std::path::PathBuf;
use std::sync::Arc;

use osler_personas::{PersonaError, PersonaStore};

/// Create a unique scratch directory seeded with the given persona files.
fn scratch_store(files: &[(&str, &str)]) -> (PersonaStore, PathBuf) {
    let dir = std::env::temp_dir().join(format!("osler-personas-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    for (patient_id, json) in files {
        std::fs::write(dir.join(format!("{patient_id}.persona.json")), json).unwrap();
    }
    (PersonaStore::new(&dir), dir)
}

const ANKLE: &str = r#"{
    "meta": { "patient_id": "P-0002" },
    "identity": { "preferred_name": "Jordan", "age": 19 },
    "condition": "lateral ankle sprain",
    "chief_complaint": "I rolled my ankle at practice.",
    "hpi": { "onset": "two days ago", "severity_nrs": 7 }
}"#;

#[test]
fn loads_a_persona_by_id() {
    let (store, _dir) = scratch_store(&[("P-0002", ANKLE)]);

    let persona = store.load("P-0002").unwrap();
    assert_eq!(persona.identity.preferred_name.as_deref(), Some("Jordan"));
    assert_eq!(persona.hpi.severity_nrs, Some(7.0));
}

#[test]
fn unknown_id_is_not_found() {
    let (store, _dir) = scratch_store(&[]);

    match store.load("P-9999") {
        Err(PersonaError::NotFound { patient_id }) => assert_eq!(patient_id, "P-9999"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn malformed_json_is_surfaced_distinctly() {
    let (store, _dir) = scratch_store(&[("P-0003", "{ not json")]);

    assert!(matches!(
        store.load("P-0003"),
        Err(PersonaError::Malformed { .. })
    ));
}

#[test]
fn sparse_persona_still_loads() {
    // Every field is optional at the data level.
    let (store, _dir) = scratch_store(&[("P-0004", "{}")]);

    let persona = store.load("P-0004").unwrap();
    assert!(persona.chief_complaint.is_none());
    assert!(!persona.interpreter_required());
}

#[test]
fn repeat_lookups_hit_the_cache() {
    let (store, dir) = scratch_store(&[("P-0002", ANKLE)]);

    let first = store.load("P-0002").unwrap();

    // Delete the backing file; the cached record must still resolve.
    std::fs::remove_file(dir.join("P-0002.persona.json")).unwrap();
    let second = store.load("P-0002").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn list_scans_the_directory_and_sorts_by_id() {
    let (store, dir) = scratch_store(&[
        ("P-0011", r#"{ "identity": { "preferred_name": "Oksana" } }"#),
        ("P-0002", ANKLE),
    ]);
    // Unrelated files are ignored.
    std::fs::write(dir.join("README.txt"), "not a persona").unwrap();

    let listed = store.list().unwrap();
    let ids: Vec<&str> = listed.iter().map(|s| s.patient_id.as_str()).collect();
    assert_eq!(ids, vec!["P-0002", "P-0011"]);
    assert_eq!(listed[0].condition.as_deref(), Some("lateral ankle sprain"));
}

#[test]
fn list_skips_unreadable_files_instead_of_failing() {
    let (store, _dir) = scratch_store(&[("P-0002", ANKLE), ("P-BAD", "{ nope")]);

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].patient_id, "P-0002");
}
