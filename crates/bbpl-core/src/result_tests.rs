// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

fn step(name: &str, state: StepState) -> StepResult {
    StepResult {
        name: name.into(),
        state,
        exit_code: Some(if state.is_success() { 0 } else { 1 }),
        output: vec![],
        duration: Duration::from_secs(1),
        error: None,
    }
}

#[test]
fn parallel_result_success_is_and_of_children() {
    let all_ok = ParallelResult {
        failed_fast: false,
        children: vec![
            step("a", StepState::Succeeded),
            step("b", StepState::Succeeded),
        ],
    };
    assert!(all_ok.success());

    let one_failed = ParallelResult {
        failed_fast: true,
        children: vec![
            step("a", StepState::Failed),
            step("b", StepState::Cancelled),
        ],
    };
    assert!(!one_failed.success());
}

#[test]
fn execution_result_first_failure_reports_failing_step_name() {
    let result = ExecutionResult {
        success: false,
        pipeline_label: "default".into(),
        items: vec![
            ItemResult::Step(step("ok", StepState::Succeeded)),
            ItemResult::Step(step("broken", StepState::Failed)),
            ItemResult::Step(step("never-run", StepState::Pending)),
        ],
        duration: Duration::from_secs(2),
    };
    assert_eq!(result.first_failure(), Some("broken"));
}

#[test]
fn step_result_cancelled_has_synthetic_failure() {
    let cancelled = StepResult::cancelled("sleeper");
    assert_eq!(cancelled.state, StepState::Cancelled);
    assert_eq!(cancelled.exit_code, Some(1));
    assert!(!cancelled.success());
}
