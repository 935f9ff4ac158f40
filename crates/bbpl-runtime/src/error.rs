// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("docker error: {0}")]
    Docker(#[from] bollard::errors::Error),
    #[error("docker connection failed: {0}")]
    Connect(bollard::errors::Error),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
