// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use bbpl_core::{Image, PipelineItem};
use std::io::Write;

#[test]
fn loads_a_simple_pipeline() {
    let yaml = "\
image: node:20
pipelines:
  default:
    - step:
        name: build
        script:
          - npm install
          - npm test
";
    let doc = load_document_str(yaml).unwrap();
    assert_eq!(doc.image.unwrap().name(), "node:20");
    let default = doc.pipelines.default.unwrap();
    assert_eq!(default.items().len(), 1);
    match &default.items()[0] {
        PipelineItem::Step(step) => {
            assert_eq!(step.name.as_deref(), Some("build"));
            assert_eq!(step.script, vec!["npm install", "npm test"]);
        }
        PipelineItem::Parallel(_) => panic!("expected a step"),
    }
}

#[test]
fn loads_a_parallel_group_with_hyphenated_keys() {
    let yaml = "\
pipelines:
  default:
    - parallel:
        fail-fast: false
        steps:
          - step:
              name: unit
              script: echo unit
          - step:
              name: lint
              script: echo lint
";
    let doc = load_document_str(yaml).unwrap();
    let default = doc.pipelines.default.unwrap();
    match &default.items()[0] {
        PipelineItem::Parallel(group) => {
            assert!(!group.fail_fast);
            assert_eq!(group.steps.len(), 2);
        }
        PipelineItem::Step(_) => panic!("expected a parallel group"),
    }
}

#[test]
fn hyphenated_and_camel_keys_merge_with_camel_winning() {
    let yaml = "\
pipelines:
  default:
    - step:
        script: echo hi
        max-time: 99
        maxTime: 5
";
    let doc = load_document_str(yaml).unwrap();
    match &doc.pipelines.default.unwrap().items()[0] {
        PipelineItem::Step(step) => assert_eq!(step.max_time, Some(5.0)),
        PipelineItem::Parallel(_) => panic!("expected a step"),
    }
}

#[test]
fn detailed_image_round_trips() {
    let yaml = "\
image:
  name: python:3.11
  username: me
  password: secret
pipelines:
  default:
    - step:
        script: echo hi
";
    let doc = load_document_str(yaml).unwrap();
    match doc.image.unwrap() {
        Image::Detailed(d) => {
            assert_eq!(d.name, "python:3.11");
            assert_eq!(d.username.as_deref(), Some("me"));
        }
        Image::Name(_) => panic!("expected a detailed image"),
    }
}

#[test]
fn missing_file_reports_not_found() {
    let missing = std::path::Path::new("/no/such/bitbucket-pipelines.yml");
    let err = load_document(missing).unwrap_err();
    assert!(matches!(err, DocumentError::NotFound(_)));
}

#[test]
fn empty_document_is_rejected() {
    let err = load_document_str("").unwrap_err();
    assert!(matches!(err, DocumentError::NotAMapping));
}

#[test]
fn loads_from_a_real_file_on_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "pipelines:\n  default:\n    - step:\n        script: echo hi\n"
    )
    .unwrap();
    let doc = load_document(file.path()).unwrap();
    assert!(doc.pipelines.default.is_some());
}
