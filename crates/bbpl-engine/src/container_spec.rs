// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Translates a canonical [`Step`] into the [`ContainerSpec`] the Runtime
//! Driver understands.

use crate::environment::CLONE_DIR;
use bbpl_core::{Document, Image, RunnerConfig, Size, Step};
use bbpl_runtime::{parse_memory_bytes, parse_nano_cpus, Bind, ContainerSpec};
use std::collections::BTreeMap;
use std::path::Path;

/// Resolves the image a step runs under: step override, else the
/// document-level default, else the runner's configured default.
pub fn resolve_image<'a>(
    document: &'a Document,
    step: &'a Step,
    runner_config: &'a RunnerConfig,
) -> ResolvedImage<'a> {
    let image = step.image.as_ref().or(document.image.as_ref());

    match image {
        Some(image) => ResolvedImage {
            name: image.name().to_string(),
            username: image.username(),
            password: image.password(),
        },
        None => ResolvedImage {
            name: runner_config.default_image.clone(),
            username: None,
            password: None,
        },
    }
}

pub struct ResolvedImage<'a> {
    pub name: String,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
}

/// Resolves memory/CPU limits for a step's `size`, defaulting to `1x`.
pub fn resolve_resources(
    step: &Step,
    document: &Document,
    runner_config: &RunnerConfig,
) -> (Option<i64>, Option<i64>) {
    let size = step
        .size
        .or_else(|| document.options.as_ref().and_then(|o| o.size))
        .unwrap_or(Size::X1);

    let memory = runner_config
        .memory_limits
        .get(size.as_str())
        .and_then(|s| parse_memory_bytes(s));
    let cpu = runner_config
        .cpu_limits
        .get(size.as_str())
        .and_then(|s| parse_nano_cpus(s));
    (memory, cpu)
}

/// Builds the `ContainerSpec` for one step run, bind-mounting `workspace`
/// at the clone dir and merging `env` in as the container's environment.
pub fn build_container_spec(
    step: &Step,
    document: &Document,
    runner_config: &RunnerConfig,
    network_name: &str,
    workspace: &Path,
    env: BTreeMap<String, String>,
) -> ContainerSpec {
    let image = resolve_image(document, step, runner_config);
    let (memory_bytes, nano_cpus) = resolve_resources(step, document, runner_config);
    let command = bbpl_runtime::build_command(&step.script, &step.after_script);

    ContainerSpec {
        image: image.name,
        command,
        env,
        binds: vec![Bind {
            host_path: workspace.to_string_lossy().into_owned(),
            container_path: CLONE_DIR.to_string(),
        }],
        working_dir: CLONE_DIR.to_string(),
        network_name: Some(network_name.to_string()),
        user: step.image.as_ref().and_then(|i| match i {
            Image::Detailed(d) => d.run_as_user.map(|u| u.to_string()),
            Image::Name(_) => None,
        }),
        memory_bytes,
        nano_cpus,
        exposed_ports: Vec::new(),
        port_bindings: BTreeMap::new(),
    }
}

#[cfg(test)]
#[path = "container_spec_tests.rs"]
mod tests;
