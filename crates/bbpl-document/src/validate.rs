// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validator: produces `{errors, warnings}` diagnostics for an
//! already-loaded canonical [`Document`]. Loading already rules out the
//! shape problems the loader itself rejects (missing `pipelines`, items
//! that are neither a step nor a parallel group); this pass checks the
//! content of what's left.

use bbpl_core::{Diagnostic, Document, Image, Pipeline, PipelineItem, Severity, Step};
use std::collections::BTreeMap;

const CUSTOM_NAME_PATTERN_HINT: &str = "[A-Za-z0-9_-]+";
const MAX_SCRIPT_LINES: usize = 100;
const MAX_STEP_NAME_LEN: usize = 50;
const MAX_PARALLEL_STEPS: usize = 10;
const MAX_MAX_TIME_MINUTES: f64 = 120.0;

/// Runs every error and warning check and returns the combined diagnostic list.
pub fn validate(document: &Document) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    if let Some(image) = &document.image {
        validate_image("image", image, &mut diagnostics);
    }
    validate_pipelines(document, &mut diagnostics);
    validate_definitions(document, &mut diagnostics);
    diagnostics
}

/// Diagnostics with [`Severity::Error`].
pub fn errors(document: &Document) -> Vec<Diagnostic> {
    validate(document)
        .into_iter()
        .filter(|d| d.severity == Severity::Error)
        .collect()
}

fn validate_pipelines(document: &Document, out: &mut Vec<Diagnostic>) {
    if let Some(pipeline) = &document.pipelines.default {
        validate_pipeline("pipelines.default", pipeline, out);
    }
    validate_named_group("pipelines.branches", &document.pipelines.branches, out);
    validate_named_group("pipelines.tags", &document.pipelines.tags, out);
    validate_named_group(
        "pipelines.pullrequests",
        &document.pipelines.pullrequests,
        out,
    );

    for (name, pipeline) in &document.pipelines.custom {
        let path = format!("pipelines.custom.{name}");
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            out.push(Diagnostic::warning(
                &path,
                format!("custom pipeline name does not match {CUSTOM_NAME_PATTERN_HINT}"),
            ));
        }
        validate_pipeline(&path, pipeline, out);
    }
}

fn validate_named_group(
    prefix: &str,
    group: &BTreeMap<String, Pipeline>,
    out: &mut Vec<Diagnostic>,
) {
    for (name, pipeline) in group {
        validate_pipeline(&format!("{prefix}.{name}"), pipeline, out);
    }
}

fn validate_pipeline(path: &str, pipeline: &Pipeline, out: &mut Vec<Diagnostic>) {
    if pipeline.is_empty() {
        out.push(Diagnostic::warning(path, "pipeline has no items"));
        return;
    }
    for (index, item) in pipeline.items().iter().enumerate() {
        let item_path = format!("{path}[{index}]");
        match item {
            PipelineItem::Step(step) => validate_step(&item_path, step, out),
            PipelineItem::Parallel(group) => {
                if group.steps.is_empty() {
                    out.push(Diagnostic::error(&item_path, "parallel group has no steps"));
                    continue;
                }
                if group.steps.len() == 1 {
                    out.push(Diagnostic::warning(
                        &item_path,
                        "parallel group has only one step",
                    ));
                } else if group.steps.len() > MAX_PARALLEL_STEPS {
                    out.push(Diagnostic::warning(
                        &item_path,
                        format!("parallel group has more than {MAX_PARALLEL_STEPS} steps"),
                    ));
                }
                for (child_index, step) in group.steps.iter().enumerate() {
                    validate_step(&format!("{item_path}.steps[{child_index}]"), step, out);
                }
            }
        }
    }
}

fn validate_step(path: &str, step: &Step, out: &mut Vec<Diagnostic>) {
    if step.script.is_empty() {
        out.push(Diagnostic::error(path, "step has an empty script"));
    } else if step.script.len() > MAX_SCRIPT_LINES {
        out.push(Diagnostic::warning(
            path,
            format!("script has more than {MAX_SCRIPT_LINES} lines"),
        ));
    }

    if let Some(max_time) = step.max_time {
        if max_time <= 0.0 {
            out.push(Diagnostic::error(path, "maxTime must be a positive number"));
        } else if max_time > MAX_MAX_TIME_MINUTES {
            out.push(Diagnostic::warning(
                path,
                format!("maxTime is greater than {MAX_MAX_TIME_MINUTES} minutes"),
            ));
        }
    }

    if let Some(image) = &step.image {
        validate_image(&format!("{path}.image"), image, out);
    }

    if let Some(artifacts) = &step.artifacts {
        if artifacts.paths.is_empty() {
            out.push(Diagnostic::error(
                format!("{path}.artifacts"),
                "artifacts.paths is empty",
            ));
        }
    }

    if let Some(name) = &step.name {
        if name.len() > MAX_STEP_NAME_LEN {
            out.push(Diagnostic::warning(
                path,
                format!("step name is longer than {MAX_STEP_NAME_LEN} characters"),
            ));
        }
    }
}

fn validate_image(path: &str, image: &Image, out: &mut Vec<Diagnostic>) {
    if image.name().trim().is_empty() {
        out.push(Diagnostic::error(path, "image name must not be empty"));
    }
    if image.username().is_some() && image.password().is_none() {
        out.push(Diagnostic::warning(
            path,
            "image username given without a password",
        ));
    }
}

fn validate_definitions(document: &Document, out: &mut Vec<Diagnostic>) {
    let Some(definitions) = &document.definitions else {
        return;
    };
    for (name, service) in &definitions.services {
        let path = format!("definitions.services.{name}");
        if service.image.name().trim().is_empty() {
            out.push(Diagnostic::error(
                format!("{path}.image"),
                "service image name must not be empty",
            ));
        }
    }
    for (name, step) in &definitions.steps {
        validate_step(&format!("definitions.steps.{name}"), step, out);
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
