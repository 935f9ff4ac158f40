// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Predefined cache name -> path table.

use std::path::{Path, PathBuf};

const PREDEFINED: &[(&str, &str)] = &[
    ("node", "node_modules"),
    ("npm", "~/.npm"),
    ("yarn", "~/.cache/yarn"),
    ("pip-cache", "~/.cache/pip"),
    ("composer", "vendor"),
    ("gradle", "~/.gradle/caches"),
    ("maven", "~/.m2/repository"),
    ("docker", "/var/lib/docker"),
];

/// Resolves a cache name to its source path, relative to `workspace` unless
/// the predefined (or literal) path is absolute. `~` expands to the running
/// user's home directory.
pub fn resolve_cache_path(name: &str, workspace: &Path) -> PathBuf {
    let raw = PREDEFINED
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, path)| *path)
        .unwrap_or(name);

    let expanded = expand_tilde(raw);
    if expanded.is_absolute() {
        expanded
    } else {
        workspace.join(expanded)
    }
}

fn expand_tilde(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(raw),
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
