// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),
    #[error("metadata sidecar error: {0}")]
    Metadata(#[from] serde_json::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;
