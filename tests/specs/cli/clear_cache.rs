//! `bbpl clear-cache` specs.

use crate::prelude::*;
use std::fs;

#[test]
fn clear_cache_rejects_both_scoping_flags_at_once() {
    let project = Project::with_document(MINIMAL_DOCUMENT);
    project
        .bbpl()
        .args(&["clear-cache", "--cache-only", "--artifacts-only"])
        .fails();
}

#[test]
fn clear_cache_with_no_flags_succeeds_on_an_empty_store() {
    let project = Project::with_document(MINIMAL_DOCUMENT);
    project.bbpl().args(&["clear-cache"]).passes();
}

#[test]
fn clear_cache_only_removes_cache_archives_not_artifacts() {
    let project = Project::with_document(MINIMAL_DOCUMENT);
    let artifact_dir = project.path().join(".bbpl-artifacts");
    fs::create_dir_all(artifact_dir.join("build")).unwrap();
    fs::write(artifact_dir.join("build").join("out.txt"), b"kept").unwrap();

    project
        .bbpl()
        .args(&["clear-cache", "--cache-only"])
        .passes();

    assert!(artifact_dir.join("build").join("out.txt").exists());
}
