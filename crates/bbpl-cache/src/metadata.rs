// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `.metadata.json` sidecar shared by every cache archive under one base
//! directory.

use crate::atomic::write_atomic;
use crate::error::CacheResult;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CacheMetadataEntry {
    pub name: String,
    pub size: u64,
    pub created: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub archive_hash: String,
    pub source_hash: String,
}

/// name -> metadata, persisted as a single JSON file per cache base directory.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CacheMetadataSidecar(pub BTreeMap<String, CacheMetadataEntry>);

impl CacheMetadataSidecar {
    fn sidecar_path(base: &Path) -> PathBuf {
        base.join(".metadata.json")
    }

    pub fn load(base: &Path) -> CacheResult<Self> {
        let path = Self::sidecar_path(base);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, base: &Path) -> CacheResult<()> {
        let bytes = serde_json::to_vec_pretty(&self.0)?;
        write_atomic(&Self::sidecar_path(base), &bytes)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
