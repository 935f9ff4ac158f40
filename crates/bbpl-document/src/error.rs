// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

/// Failure modes of the document loader.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("pipeline document not found at {0}")]
    NotFound(PathBuf),

    #[error("failed to read pipeline document: {0}")]
    Io(#[from] std::io::Error),

    #[error("pipeline document is empty or not a mapping")]
    NotAMapping,

    #[error("failed to parse pipeline document: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid pipeline document: {0}")]
    Validation(String),
}

pub type DocumentResult<T> = Result<T, DocumentError>;
