// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds the effective environment for a step from layered sources,
//! applying the reserved system variables last so they always win.

use crate::context::PipelineContext;
use crate::env_files::read_env_file;
use bbpl_core::RunnerConfig;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::Path;

pub const CLONE_DIR: &str = "/opt/atlassian/pipelines/agent/build";

/// Per-step marker for membership in a parallel group.
#[derive(Debug, Clone, Copy)]
pub struct ParallelMarker {
    pub count: usize,
}

pub struct EnvironmentInputs<'a> {
    pub context: &'a PipelineContext,
    pub runner_config: &'a RunnerConfig,
    pub cwd: &'a Path,
    pub user_env_file: Option<&'a Path>,
    pub step_variables: &'a BTreeMap<String, String>,
    pub step_uuid: &'a str,
    pub parallel: Option<ParallelMarker>,
    pub execution_id: &'a str,
    pub execution_timestamp: DateTime<Utc>,
}

/// Builds the full, right-biased merge described in the Environment
/// Assembler: process env, `.env`, user env file, `.env.pipelines`, runner
/// config defaults, step-local variables, then the reserved system
/// variables applied last so they can never be shadowed.
///
/// Returns the assembled environment alongside any variable names that
/// don't match the reserved-name pattern. Invalid names are surfaced, not
/// filtered: they stay in the returned map exactly as supplied.
pub fn assemble(inputs: &EnvironmentInputs<'_>) -> (BTreeMap<String, String>, Vec<String>) {
    let mut env: BTreeMap<String, String> = std::env::vars().collect();
    env.extend(read_env_file(&inputs.cwd.join(".env")));
    if let Some(path) = inputs.user_env_file {
        env.extend(read_env_file(path));
    }
    env.extend(read_env_file(&inputs.cwd.join(".env.pipelines")));
    env.extend(inputs.runner_config.default_variables.clone());
    env.extend(inputs.step_variables.clone());
    env.extend(system_variables(inputs));

    let invalid_names = env
        .keys()
        .filter(|name| !is_valid_variable_name(name))
        .cloned()
        .collect();
    (env, invalid_names)
}

fn system_variables(inputs: &EnvironmentInputs<'_>) -> BTreeMap<String, String> {
    let ctx = inputs.context;
    let mut vars = BTreeMap::new();
    vars.insert("BITBUCKET_WORKSPACE".to_string(), ctx.repo_slug.clone());
    vars.insert("BITBUCKET_REPO_SLUG".to_string(), ctx.repo_slug.clone());
    vars.insert("BITBUCKET_REPO_UUID".to_string(), ctx.repo_uuid.clone());
    vars.insert(
        "BITBUCKET_REPO_FULL_NAME".to_string(),
        ctx.repo_full_name.clone(),
    );
    vars.insert(
        "BITBUCKET_BUILD_NUMBER".to_string(),
        ctx.build_number.clone(),
    );
    vars.insert("BITBUCKET_COMMIT".to_string(), ctx.commit.clone());
    vars.insert("BITBUCKET_BRANCH".to_string(), ctx.branch.clone());
    vars.insert(
        "BITBUCKET_PIPELINE_UUID".to_string(),
        ctx.pipeline_uuid.clone(),
    );
    vars.insert(
        "BITBUCKET_STEP_UUID".to_string(),
        inputs.step_uuid.to_string(),
    );
    vars.insert(
        "BITBUCKET_STEP_TRIGGERER_UUID".to_string(),
        ctx.triggerer_uuid.clone(),
    );
    vars.insert("BITBUCKET_TAG".to_string(), String::new());
    vars.insert("BITBUCKET_BOOKMARK".to_string(), String::new());
    vars.insert("BITBUCKET_PR_ID".to_string(), String::new());
    vars.insert("BITBUCKET_PR_DESTINATION_BRANCH".to_string(), String::new());
    vars.insert(
        "BITBUCKET_DEPLOYMENT_ENVIRONMENT".to_string(),
        String::new(),
    );
    vars.insert("BITBUCKET_CLONE_DIR".to_string(), CLONE_DIR.to_string());
    vars.insert("BITBUCKET_LOCAL".to_string(), "true".to_string());
    vars.insert(
        "PARALLEL_STEP".to_string(),
        inputs.parallel.is_some().to_string(),
    );
    vars.insert(
        "PARALLEL_STEP_COUNT".to_string(),
        inputs.parallel.map(|p| p.count).unwrap_or(0).to_string(),
    );
    vars.insert(
        "BBPL_EXECUTION_ID".to_string(),
        inputs.execution_id.to_string(),
    );
    vars.insert(
        "BBPL_EXECUTION_TIMESTAMP".to_string(),
        inputs.execution_timestamp.to_rfc3339(),
    );
    vars
}

/// A variable name is valid iff it matches `^[A-Z_][A-Z0-9_]*$`,
/// case-insensitively.
pub fn is_valid_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
