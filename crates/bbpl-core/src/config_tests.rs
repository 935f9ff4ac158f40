// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn scalar_layers_replace_outright() {
    let config = RunnerConfig::default().apply(RunnerConfigFile {
        default_image: Some("node:20".into()),
        ..Default::default()
    });
    assert_eq!(config.default_image, "node:20");
    assert_eq!(config.docker_socket, "/var/run/docker.sock");
}

#[test]
fn map_layers_merge_key_by_key() {
    let mut overrides = LimitTable::new();
    overrides.insert("1x".into(), "2g".into());

    let config = RunnerConfig::default().apply(RunnerConfigFile {
        memory_limits: Some(overrides),
        ..Default::default()
    });

    assert_eq!(config.memory_limits.get("1x"), Some(&"2g".to_string()));
    // untouched entries survive the merge
    assert_eq!(config.memory_limits.get("2x"), Some(&"2g".to_string()));
}

#[test]
fn later_layers_win_over_earlier_ones() {
    let config = RunnerConfig::default()
        .apply(RunnerConfigFile {
            default_image: Some("a".into()),
            ..Default::default()
        })
        .apply(RunnerConfigFile {
            default_image: Some("b".into()),
            ..Default::default()
        });
    assert_eq!(config.default_image, "b");
}

#[test]
fn load_layered_picks_up_the_project_local_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".bitbucket-pipelines-local.yml"),
        "defaultImage: custom/image:1\n",
    )
    .unwrap();

    let config = RunnerConfig::load_layered(dir.path()).unwrap();
    assert_eq!(config.default_image, "custom/image:1");
}

#[test]
fn load_layered_tolerates_a_missing_project_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunnerConfig::load_layered(dir.path()).unwrap();
    assert_eq!(config.default_image, RunnerConfig::default().default_image);
}

#[test]
fn load_layered_rejects_a_malformed_project_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".bitbucket-pipelines-local.yml"),
        "not: [valid: yaml",
    )
    .unwrap();
    assert!(RunnerConfig::load_layered(dir.path()).is_err());
}
