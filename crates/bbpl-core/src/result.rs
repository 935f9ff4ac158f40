// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result tree produced by the scheduler as it walks a selected pipeline.

use std::time::Duration;

/// Validator diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single validator finding, carrying a dotted path into the document for
/// actionable error messages (e.g. `pipelines.default[2].step.size`).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub path: String,
}

impl Diagnostic {
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            path: path.into(),
        }
    }
}

/// Step lifecycle: `Pending -> Running -> {Succeeded, Failed, Cancelled}`.
/// Terminal states are absorbing; `Running -> Cancelled` only occurs inside a
/// fail-fast parallel group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl StepState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, StepState::Pending | StepState::Running)
    }

    pub fn is_success(self) -> bool {
        matches!(self, StepState::Succeeded)
    }
}

/// Outcome of one executed (or skipped) step.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StepResult {
    pub name: String,
    pub state: StepState,
    pub exit_code: Option<i64>,
    pub output: Vec<String>,
    pub duration: Duration,
    pub error: Option<String>,
}

impl StepResult {
    pub fn cancelled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: StepState::Cancelled,
            exit_code: Some(1),
            output: Vec::new(),
            duration: Duration::ZERO,
            error: Some("execution failed / cancelled".into()),
        }
    }

    pub fn success(&self) -> bool {
        self.state.is_success()
    }
}

/// Outcome of one parallel group.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ParallelResult {
    pub failed_fast: bool,
    pub children: Vec<StepResult>,
}

impl ParallelResult {
    pub fn success(&self) -> bool {
        self.children.iter().all(StepResult::success)
    }
}

/// One pipeline item's outcome: either a step or a parallel group.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum ItemResult {
    Step(StepResult),
    Parallel(ParallelResult),
}

impl ItemResult {
    pub fn success(&self) -> bool {
        match self {
            ItemResult::Step(s) => s.success(),
            ItemResult::Parallel(p) => p.success(),
        }
    }
}

/// Top-level result returned by the engine façade for one run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub pipeline_label: String,
    pub items: Vec<ItemResult>,
    pub duration: Duration,
}

impl ExecutionResult {
    /// First failing step or group name, if any, for the top-level banner.
    pub fn first_failure(&self) -> Option<&str> {
        for item in &self.items {
            match item {
                ItemResult::Step(s) if !s.success() => return Some(&s.name),
                ItemResult::Parallel(p) if !p.success() => {
                    return p
                        .children
                        .iter()
                        .find(|c| !c.success())
                        .map(|c| c.name.as_str());
                }
                _ => {}
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
