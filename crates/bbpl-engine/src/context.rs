// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run pipeline context: the synthesized stand-ins for the repository
//! metadata a hosted CI service would normally provide.

use bbpl_core::IdGen;
use std::path::{Path, PathBuf};

/// Placeholder repo UUID used when no real repository metadata exists.
const ZERO_UUID: &str = "{00000000-0000-0000-0000-000000000000}";

#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub workspace: PathBuf,
    pub branch: String,
    pub commit: String,
    pub build_number: String,
    pub repo_name: String,
    pub repo_slug: String,
    pub repo_full_name: String,
    pub repo_uuid: String,
    pub pipeline_uuid: String,
    pub triggerer_uuid: String,
}

impl PipelineContext {
    /// Builds the context for a local run: branch is the override if given,
    /// else `"local"`; commit and build number are synthesized; repo
    /// name/slug come from the workspace's basename.
    pub fn for_local_run(
        workspace: impl Into<PathBuf>,
        branch_override: Option<String>,
        id_gen: &dyn IdGen,
    ) -> Self {
        let workspace = workspace.into();
        let repo_name = workspace
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workspace".to_string());
        let repo_slug = repo_name.to_lowercase().replace([' ', '_'], "-");

        Self {
            branch: branch_override.unwrap_or_else(|| "local".to_string()),
            commit: "local-commit".to_string(),
            build_number: epoch_millis().to_string(),
            repo_full_name: repo_slug.clone(),
            repo_slug,
            repo_name,
            repo_uuid: ZERO_UUID.to_string(),
            pipeline_uuid: format!("{{{}}}", id_gen.next()),
            triggerer_uuid: format!("{{{}}}", id_gen.next()),
            workspace,
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }
}

fn epoch_millis() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
