// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy shared across the engine crates.
//!
//! Each variant is a *kind*, not a concrete subsystem type: callers match on
//! the kind to decide propagation policy rather than on crate
//! boundaries.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("selection error: {0}")]
    Selection(String),

    #[error("docker error: {0}")]
    Docker(String),

    #[error("container error: {0}")]
    Container(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("cancelled by user")]
    UserCancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Exit codes: 0 only for overall success, handled by the caller.
    /// Every `EngineError` maps to process exit code 1.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
