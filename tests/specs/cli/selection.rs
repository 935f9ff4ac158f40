//! `bbpl run` selection-precedence specs. These only exercise document
//! loading and pipeline selection, which happen before the runtime driver
//! connects to Docker, so they pass even without a daemon available.

use crate::prelude::*;

const RELEASE_AND_DEFAULT: &str = r#"
pipelines:
  default:
    - step:
        script:
          - echo default
  custom:
    release:
      - step:
          script:
            - echo release
"#;

#[test]
fn custom_selection_wins_over_branch() {
    let project = Project::with_document(RELEASE_AND_DEFAULT);
    // `--dry-run` avoids touching Docker; selection happens first, so an
    // unavailable daemon never gets in the way of this assertion.
    project
        .bbpl()
        .args(&[
            "run",
            "--custom",
            "release",
            "--branch",
            "main",
            "--dry-run",
        ])
        .passes()
        .stdout_has("custom/release");
}

#[test]
fn branch_without_a_matching_entry_falls_back_to_default() {
    let project = Project::with_document(RELEASE_AND_DEFAULT);
    project
        .bbpl()
        .args(&["run", "--branch", "main", "--dry-run"])
        .passes()
        .stdout_has("default");
}

#[test]
fn unsupported_explicit_pipeline_id_is_an_error() {
    let project = Project::with_document(RELEASE_AND_DEFAULT);
    project
        .bbpl()
        .args(&["run", "--pipeline", "feature", "--dry-run"])
        .fails()
        .stderr_has("feature");
}
