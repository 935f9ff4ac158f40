// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves a selection intent (custom name / branch name / explicit
//! pipeline id / default) to exactly one pipeline in the document.

use bbpl_core::{Document, EngineError, EngineResult, Pipeline};

/// CLI-facing selection intent. At most one of these is expected to be set;
/// [`select_pipeline`] still honors the documented precedence if more than
/// one is present.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub custom: Option<String>,
    pub branch: Option<String>,
    pub pipeline: Option<String>,
}

/// The resolved pipeline plus its display label (`default`, `branches/<name>`,
/// `custom/<name>`, ...).
pub struct Selected<'a> {
    pub pipeline: &'a Pipeline,
    pub label: String,
}

pub fn select_pipeline<'a>(
    document: &'a Document,
    selection: &Selection,
) -> EngineResult<Selected<'a>> {
    let pipelines = &document.pipelines;

    if let Some(custom) = &selection.custom {
        return pipelines
            .custom
            .get(custom)
            .map(|p| Selected {
                pipeline: p,
                label: format!("custom/{custom}"),
            })
            .ok_or_else(|| EngineError::Selection(format!("no custom pipeline named '{custom}'")));
    }

    if let Some(branch) = &selection.branch {
        if let Some(p) = pipelines.branches.get(branch) {
            return Ok(Selected {
                pipeline: p,
                label: format!("branches/{branch}"),
            });
        }
        return pipelines
            .default
            .as_ref()
            .map(|p| Selected {
                pipeline: p,
                label: "default".to_string(),
            })
            .ok_or_else(|| {
                EngineError::Selection(format!(
                    "no pipeline for branch '{branch}' and no default pipeline"
                ))
            });
    }

    if let Some(pipeline) = &selection.pipeline {
        if pipeline != "default" {
            return Err(EngineError::Selection(format!(
                "unsupported pipeline id '{pipeline}'; only 'default' is accepted"
            )));
        }
        return pipelines
            .default
            .as_ref()
            .map(|p| Selected {
                pipeline: p,
                label: "default".to_string(),
            })
            .ok_or_else(|| EngineError::Selection("no default pipeline defined".to_string()));
    }

    pipelines
        .default
        .as_ref()
        .map(|p| Selected {
            pipeline: p,
            label: "default".to_string(),
        })
        .ok_or_else(|| EngineError::Selection("no default pipeline defined".to_string()))
}

/// A sorted list of labels for every pipeline in the document, in the form
/// `default`, `branches/<name>`, `tags/<name>`, `custom/<name>`.
pub fn list_labels(document: &Document) -> Vec<String> {
    let pipelines = &document.pipelines;
    let mut labels = Vec::new();
    if pipelines.default.is_some() {
        labels.push("default".to_string());
    }
    labels.extend(pipelines.branches.keys().map(|k| format!("branches/{k}")));
    labels.extend(pipelines.tags.keys().map(|k| format!("tags/{k}")));
    labels.extend(pipelines.custom.keys().map(|k| format!("custom/{k}")));
    labels.sort();
    labels
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
