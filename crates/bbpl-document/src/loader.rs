// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Document loader: reads a pipeline document off disk and
//! produces a canonical [`bbpl_core::Document`], or a typed failure.

use crate::error::{DocumentError, DocumentResult};
use crate::lift::lift_document;
use crate::normalize::normalize_keys;
use bbpl_core::Document;
use serde_yaml::Value;
use std::path::Path;

/// Loads and canonicalizes the pipeline document at `path`.
pub fn load_document(path: &Path) -> DocumentResult<Document> {
    let text = std::fs::read_to_string(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            DocumentError::NotFound(path.to_path_buf())
        } else {
            DocumentError::Io(err)
        }
    })?;
    load_document_str(&text)
}

/// Same as [`load_document`] but from an in-memory string, for tests and
/// callers that already have document bytes.
pub fn load_document_str(text: &str) -> DocumentResult<Document> {
    let mut value: Value = serde_yaml::from_str(text)?;
    if !matches!(value, Value::Mapping(_)) {
        return Err(DocumentError::NotAMapping);
    }

    normalize_keys(&mut value);
    lift_document(&mut value)?;

    let document: Document = serde_yaml::from_value(value)?;
    Ok(document)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
