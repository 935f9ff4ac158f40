// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Artifact store: per-step directories of files matched by glob
//! patterns, with a `.metadata.json` sidecar per step directory.

use crate::atomic::write_atomic;
use crate::error::CacheResult;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct ArtifactMetadata {
    step_name: String,
    timestamp: chrono::DateTime<Utc>,
    patterns: Vec<String>,
    files: Vec<String>,
    total_size: u64,
}

pub struct ArtifactStore {
    base: PathBuf,
    enabled: bool,
}

impl ArtifactStore {
    pub fn new(base: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            base: base.into(),
            enabled,
        }
    }

    /// Replaces every run of characters outside `[A-Za-z0-9_-]` with `_`,
    /// collapses runs of `_`, trims leading/trailing `_`, lowercases.
    pub fn sanitize_step_name(name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        let mut last_was_underscore = false;
        for ch in name.chars() {
            if ch.is_ascii_alphanumeric() || ch == '-' {
                out.push(ch.to_ascii_lowercase());
                last_was_underscore = false;
            } else if !last_was_underscore {
                out.push('_');
                last_was_underscore = true;
            }
        }
        out.trim_matches('_').to_string()
    }

    fn step_dir(&self, step_name: &str) -> PathBuf {
        self.base.join(Self::sanitize_step_name(step_name))
    }

    /// Copies every file matched by `patterns` (resolved with `cwd =
    /// source_dir`) into the step's artifact directory.
    pub fn save(&self, patterns: &[String], source_dir: &Path, step_name: &str) -> CacheResult<()> {
        if !self.enabled {
            return Ok(());
        }

        let step_dir = self.step_dir(step_name);
        let mut files = Vec::new();
        let mut total_size = 0u64;

        for pattern in patterns {
            let full_pattern = source_dir.join(pattern);
            let Ok(matches) = glob::glob(&full_pattern.to_string_lossy()) else {
                continue;
            };
            for path in matches.flatten() {
                if !path.is_file() {
                    continue;
                }
                let Ok(relative) = path.strip_prefix(source_dir) else {
                    continue;
                };
                let dest = step_dir.join(relative);
                if let Some(parent) = dest.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::copy(&path, &dest)?;
                total_size += std::fs::metadata(&dest)?.len();
                files.push(relative.to_string_lossy().into_owned());
            }
        }

        let metadata = ArtifactMetadata {
            step_name: step_name.to_string(),
            timestamp: Utc::now(),
            patterns: patterns.to_vec(),
            files,
            total_size,
        };
        let bytes = serde_json::to_vec_pretty(&metadata)?;
        write_atomic(&step_dir.join(".metadata.json"), &bytes)?;
        Ok(())
    }

    /// Copies every file from one step's directory (or every step directory
    /// when `step_name` is `None`) into `target_dir`, preserving relative
    /// paths. Failures are logged and swallowed.
    pub fn restore(&self, target_dir: &Path, step_name: Option<&str>) {
        let step_dirs: Vec<PathBuf> = match step_name {
            Some(name) => vec![self.step_dir(name)],
            None => std::fs::read_dir(&self.base)
                .into_iter()
                .flatten()
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.is_dir())
                .collect(),
        };

        for step_dir in step_dirs {
            if let Err(err) = Self::restore_one(&step_dir, target_dir) {
                warn!(dir = %step_dir.display(), error = %err, "artifact restore failed");
            }
        }
    }

    fn restore_one(step_dir: &Path, target_dir: &Path) -> std::io::Result<()> {
        for entry in walk_files(step_dir) {
            let relative = entry.strip_prefix(step_dir).unwrap_or(&entry);
            if relative.file_name().and_then(|n| n.to_str()) == Some(".metadata.json") {
                continue;
            }
            let dest = target_dir.join(relative);
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(&entry, &dest)?;
        }
        Ok(())
    }

    /// Removes every entry under the artifact base. No-op when disabled.
    pub fn clear_artifacts(&self) -> CacheResult<()> {
        if !self.enabled {
            return Ok(());
        }
        match std::fs::remove_dir_all(&self.base) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn walk_files(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return out;
    };
    for entry in read_dir.flatten() {
        let path = entry.path();
        if path.is_dir() {
            out.extend(walk_files(&path));
        } else {
            out.push(path);
        }
    }
    out
}

#[cfg(test)]
#[path = "artifact_store_tests.rs"]
mod tests;
