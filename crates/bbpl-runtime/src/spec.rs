// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime-agnostic description of a container to create and run.

use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ContainerSpec {
    pub image: String,
    pub command: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub binds: Vec<Bind>,
    pub working_dir: String,
    pub network_name: Option<String>,
    pub user: Option<String>,
    pub memory_bytes: Option<i64>,
    pub nano_cpus: Option<i64>,
    pub exposed_ports: Vec<String>,
    pub port_bindings: BTreeMap<String, Vec<(String, String)>>,
}

#[derive(Debug, Clone)]
pub struct Bind {
    pub host_path: String,
    pub container_path: String,
}

#[derive(Debug, Clone)]
pub struct ContainerHandle {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub exit_code: i64,
    pub output: Vec<String>,
    pub error: Option<String>,
    pub duration: Duration,
}

impl RunOutcome {
    pub fn driver_failure(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            exit_code: 1,
            output: Vec::new(),
            error: Some(message.into()),
            duration,
        }
    }
}
