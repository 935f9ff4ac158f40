// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hyphen -> camel key normalization. Runs before structural
//! lifts and typed deserialization so that every downstream consumer only
//! ever sees the canonical camelCase key.

use serde_yaml::Value;

/// `(hyphen-case, camelCase)` pairs recognized anywhere in the document tree.
const RENAMES: &[(&str, &str)] = &[
    ("max-time", "maxTime"),
    ("after-script", "afterScript"),
    ("run-as-user", "runAsUser"),
    ("pull-requests", "pullrequests"),
    ("fail-fast", "failFast"),
    ("include-paths", "includePaths"),
    ("exclude-paths", "excludePaths"),
];

/// Walks the whole tree, renaming hyphen-case keys to their camelCase form.
/// If both variants are present on the same mapping, camel wins and the
/// hyphen entry is dropped.
pub fn normalize_keys(value: &mut Value) {
    match value {
        Value::Mapping(mapping) => {
            for (hyphen, camel) in RENAMES {
                let hyphen_key = Value::String((*hyphen).to_string());
                let camel_key = Value::String((*camel).to_string());
                if let Some(hyphen_value) = mapping.remove(&hyphen_key) {
                    mapping.entry(camel_key).or_insert(hyphen_value);
                }
            }
            for (_, v) in mapping.iter_mut() {
                normalize_keys(v);
            }
        }
        Value::Sequence(items) => {
            for item in items {
                normalize_keys(item);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
