// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structural lifts: unwrapping `step`/`parallel` wrappers and
//! promoting bare scalar/list shorthand to their structured forms, so that
//! the result deserializes straight into [`bbpl_core::Document`]'s
//! externally-tagged `PipelineItem` enum.

use crate::error::DocumentError;
use serde_yaml::{Mapping, Value};

const PIPELINE_KEYS: &[&str] = &["branches", "tags", "pullrequests", "custom"];

/// Applies every structural lift to the normalized document tree in place.
pub fn lift_document(value: &mut Value) -> Result<(), DocumentError> {
    let pipelines = value
        .as_mapping_mut()
        .and_then(|m| m.get_mut(Value::String("pipelines".into())))
        .ok_or_else(|| DocumentError::Validation("pipelines is required".into()))?;
    let pipelines = pipelines
        .as_mapping_mut()
        .ok_or_else(|| DocumentError::Validation("pipelines must be a mapping".into()))?;

    if let Some(default) = pipelines.get_mut(Value::String("default".into())) {
        lift_pipeline(default)?;
    }
    for key in PIPELINE_KEYS {
        if let Some(group) = pipelines.get_mut(Value::String((*key).to_string())) {
            let group = group.as_mapping_mut().ok_or_else(|| {
                DocumentError::Validation(format!("pipelines.{key} must be a mapping"))
            })?;
            for (_, pipeline) in group.iter_mut() {
                lift_pipeline(pipeline)?;
            }
        }
    }

    if let Some(definitions) = value
        .as_mapping_mut()
        .and_then(|m| m.get_mut(Value::String("definitions".into())))
        .and_then(Value::as_mapping_mut)
    {
        if let Some(steps) = definitions
            .get_mut(Value::String("steps".into()))
            .and_then(Value::as_mapping_mut)
        {
            for (_, step) in steps.iter_mut() {
                lift_step_body(step)?;
            }
        }
    }

    Ok(())
}

fn lift_pipeline(pipeline: &mut Value) -> Result<(), DocumentError> {
    let items = pipeline.as_sequence_mut().ok_or_else(|| {
        DocumentError::Validation("a pipeline must be a sequence of items".into())
    })?;
    for item in items {
        *item = lift_item(item)?;
    }
    Ok(())
}

fn lift_item(item: &mut Value) -> Result<Value, DocumentError> {
    let mapping = item
        .as_mapping_mut()
        .ok_or_else(|| DocumentError::Validation("a pipeline item must be a mapping".into()))?;

    if let Some(mut step) = mapping.remove(Value::String("step".into())) {
        lift_step_body(&mut step)?;
        return Ok(step);
    }

    if let Some(mut parallel) = mapping.remove(Value::String("parallel".into())) {
        let parallel = parallel
            .as_mapping_mut()
            .ok_or_else(|| DocumentError::Validation("parallel must be a mapping".into()))?;
        let mut steps = parallel
            .remove(Value::String("steps".into()))
            .and_then(|v| v.as_sequence().cloned())
            .ok_or_else(|| DocumentError::Validation("parallel must declare steps".into()))?;
        for step in steps.iter_mut() {
            if let Some(step_mapping) = step.as_mapping_mut() {
                if let Some(unwrapped) = step_mapping.remove(Value::String("step".into())) {
                    *step = unwrapped;
                }
            }
            lift_step_body(step)?;
        }

        let mut normalized = Mapping::new();
        normalized.insert(Value::String("steps".into()), Value::Sequence(steps));
        if let Some(fail_fast) = parallel.remove(Value::String("failFast".into())) {
            normalized.insert(Value::String("failFast".into()), fail_fast);
        }
        return Ok(Value::Mapping(normalized));
    }

    Err(DocumentError::Validation(
        "a pipeline item must contain either step or parallel".into(),
    ))
}

/// Promotes a bare `script` string to a one-element sequence and a bare
/// `artifacts` list of strings to `{paths: [...]}`.
fn lift_step_body(step: &mut Value) -> Result<(), DocumentError> {
    let mapping = step
        .as_mapping_mut()
        .ok_or_else(|| DocumentError::Validation("a step must be a mapping".into()))?;

    if let Some(script) = mapping.get_mut(Value::String("script".into())) {
        if let Value::String(line) = script {
            *script = Value::Sequence(vec![Value::String(line.clone())]);
        }
    }

    if let Some(artifacts) = mapping.get_mut(Value::String("artifacts".into())) {
        if let Value::Sequence(paths) = artifacts {
            let mut promoted = Mapping::new();
            promoted.insert(
                Value::String("paths".into()),
                Value::Sequence(paths.clone()),
            );
            *artifacts = Value::Mapping(promoted);
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "lift_tests.rs"]
mod tests;
