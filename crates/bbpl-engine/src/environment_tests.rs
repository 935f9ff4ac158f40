// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use bbpl_core::SequentialIdGen;
use std::collections::BTreeMap;

fn test_context() -> PipelineContext {
    let id_gen = SequentialIdGen::new("id");
    PipelineContext::for_local_run("/tmp/repo", None, &id_gen)
}

#[test]
fn reserved_variables_always_win_over_step_locals() {
    let ctx = test_context();
    let runner_config = RunnerConfig::default();
    let mut step_variables = BTreeMap::new();
    step_variables.insert("BITBUCKET_BRANCH".to_string(), "spoofed".to_string());

    let inputs = EnvironmentInputs {
        context: &ctx,
        runner_config: &runner_config,
        cwd: Path::new("/tmp/does-not-exist"),
        user_env_file: None,
        step_variables: &step_variables,
        step_uuid: "{step-1}",
        parallel: None,
        execution_id: "exec-1",
        execution_timestamp: Utc::now(),
    };

    let (env, _invalid) = assemble(&inputs);
    assert_eq!(
        env.get("BITBUCKET_BRANCH").map(String::as_str),
        Some("local")
    );
}

#[test]
fn step_local_variables_pass_through_when_not_reserved() {
    let ctx = test_context();
    let runner_config = RunnerConfig::default();
    let mut step_variables = BTreeMap::new();
    step_variables.insert("MY_FLAG".to_string(), "on".to_string());

    let inputs = EnvironmentInputs {
        context: &ctx,
        runner_config: &runner_config,
        cwd: Path::new("/tmp/does-not-exist"),
        user_env_file: None,
        step_variables: &step_variables,
        step_uuid: "{step-1}",
        parallel: None,
        execution_id: "exec-1",
        execution_timestamp: Utc::now(),
    };

    let (env, _invalid) = assemble(&inputs);
    assert_eq!(env.get("MY_FLAG").map(String::as_str), Some("on"));
}

#[test]
fn parallel_marker_sets_flag_and_count() {
    let ctx = test_context();
    let runner_config = RunnerConfig::default();
    let step_variables = BTreeMap::new();

    let inputs = EnvironmentInputs {
        context: &ctx,
        runner_config: &runner_config,
        cwd: Path::new("/tmp/does-not-exist"),
        user_env_file: None,
        step_variables: &step_variables,
        step_uuid: "{step-1}",
        parallel: Some(ParallelMarker { count: 3 }),
        execution_id: "exec-1",
        execution_timestamp: Utc::now(),
    };

    let (env, _invalid) = assemble(&inputs);
    assert_eq!(env.get("PARALLEL_STEP").map(String::as_str), Some("true"));
    assert_eq!(
        env.get("PARALLEL_STEP_COUNT").map(String::as_str),
        Some("3")
    );
}

#[test]
fn no_parallel_marker_reports_false_and_zero() {
    let ctx = test_context();
    let runner_config = RunnerConfig::default();
    let step_variables = BTreeMap::new();

    let inputs = EnvironmentInputs {
        context: &ctx,
        runner_config: &runner_config,
        cwd: Path::new("/tmp/does-not-exist"),
        user_env_file: None,
        step_variables: &step_variables,
        step_uuid: "{step-1}",
        parallel: None,
        execution_id: "exec-1",
        execution_timestamp: Utc::now(),
    };

    let (env, _invalid) = assemble(&inputs);
    assert_eq!(env.get("PARALLEL_STEP").map(String::as_str), Some("false"));
    assert_eq!(
        env.get("PARALLEL_STEP_COUNT").map(String::as_str),
        Some("0")
    );
}

#[test]
fn invalid_step_variable_names_are_surfaced_but_kept() {
    let ctx = test_context();
    let runner_config = RunnerConfig::default();
    let mut step_variables = BTreeMap::new();
    step_variables.insert("has-hyphen".to_string(), "oops".to_string());
    step_variables.insert("VALID_NAME".to_string(), "fine".to_string());

    let inputs = EnvironmentInputs {
        context: &ctx,
        runner_config: &runner_config,
        cwd: Path::new("/tmp/does-not-exist"),
        user_env_file: None,
        step_variables: &step_variables,
        step_uuid: "{step-1}",
        parallel: None,
        execution_id: "exec-1",
        execution_timestamp: Utc::now(),
    };

    let (env, invalid) = assemble(&inputs);
    assert_eq!(env.get("has-hyphen").map(String::as_str), Some("oops"));
    assert!(invalid.iter().any(|name| name == "has-hyphen"));
    assert!(!invalid.iter().any(|name| name == "VALID_NAME"));
}

#[test]
fn validates_variable_names_case_insensitively() {
    assert!(is_valid_variable_name("FOO_BAR"));
    assert!(is_valid_variable_name("foo_bar"));
    assert!(is_valid_variable_name("_leading"));
    assert!(!is_valid_variable_name("1leading"));
    assert!(!is_valid_variable_name("has-hyphen"));
    assert!(!is_valid_variable_name(""));
}
