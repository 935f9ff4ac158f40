//! `bbpl validate` specs.

use crate::prelude::*;

#[test]
fn validate_passes_for_a_well_formed_document() {
    let project = Project::with_document(MINIMAL_DOCUMENT);
    project.bbpl().args(&["validate"]).passes();
}

#[test]
fn validate_fails_for_malformed_yaml() {
    let project = Project::with_document("not: [valid: yaml");
    project
        .bbpl()
        .args(&["validate"])
        .fails()
        .stderr_has("Error");
}

#[test]
fn validate_fails_when_document_is_missing() {
    let project = Project::empty();
    project.bbpl().args(&["validate"]).fails();
}

#[test]
fn validate_json_output_is_parseable() {
    let project = Project::with_document(MINIMAL_DOCUMENT);
    let result = project.bbpl().args(&["-o", "json", "validate"]).passes();
    let value: serde_json::Value = serde_json::from_str(&result.stdout()).unwrap();
    assert!(value.as_array().unwrap().is_empty());
}
