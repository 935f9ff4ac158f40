//! `bbpl list` specs.

use crate::prelude::*;

const MULTI_PIPELINE_DOCUMENT: &str = r#"
image: atlassian/default-image:3
pipelines:
  default:
    - step:
        script:
          - echo default
  branches:
    main:
      - step:
          script:
            - echo main
  custom:
    release:
      - step:
          script:
            - echo release
"#;

#[test]
fn list_includes_default_pipeline() {
    let project = Project::with_document(MINIMAL_DOCUMENT);
    project
        .bbpl()
        .args(&["list"])
        .passes()
        .stdout_has("default");
}

#[test]
fn list_includes_branch_and_custom_labels() {
    let project = Project::with_document(MULTI_PIPELINE_DOCUMENT);
    project
        .bbpl()
        .args(&["list"])
        .passes()
        .stdout_has("default")
        .stdout_has("branches/main")
        .stdout_has("custom/release");
}

#[test]
fn list_json_output_is_an_array_of_strings() {
    let project = Project::with_document(MULTI_PIPELINE_DOCUMENT);
    let result = project.bbpl().args(&["-o", "json", "list"]).passes();
    let labels: Vec<String> = serde_json::from_str(&result.stdout()).unwrap();
    assert!(labels.contains(&"default".to_string()));
}
