// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cache store: named gzip-compressed tar archives, written
//! atomically and tracked in a shared `.metadata.json` sidecar.

use crate::atomic::write_atomic;
use crate::error::{CacheError, CacheResult};
use crate::hash::{sha256_file, sha256_tree};
use crate::metadata::{CacheMetadataEntry, CacheMetadataSidecar};
use chrono::Utc;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 3600);

pub struct CacheStore {
    base: PathBuf,
}

impl CacheStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn archive_path(&self, name: &str) -> PathBuf {
        self.base.join(format!("{name}.tar.gz"))
    }

    /// Extracts `<cacheBase>/<name>.tar.gz` with `target_path`'s parent as
    /// the extraction root. Returns `false` (not an error) if the archive
    /// doesn't exist, or if extraction fails for any reason.
    pub fn restore(&self, name: &str, target_path: &Path) -> bool {
        let archive_path = self.archive_path(name);
        if !archive_path.exists() {
            return false;
        }

        let extraction_root = target_path.parent().unwrap_or_else(|| Path::new("."));
        match self.extract(&archive_path, extraction_root) {
            Ok(()) => {
                self.touch_last_accessed(name);
                true
            }
            Err(err) => {
                warn!(cache = name, error = %err, "cache restore failed");
                false
            }
        }
    }

    fn extract(&self, archive_path: &Path, extraction_root: &Path) -> CacheResult<()> {
        std::fs::create_dir_all(extraction_root)?;
        let file = std::fs::File::open(archive_path)?;
        let decoder = GzDecoder::new(file);
        let mut archive = tar::Archive::new(decoder);
        archive.unpack(extraction_root)?;
        Ok(())
    }

    fn touch_last_accessed(&self, name: &str) {
        let Ok(mut sidecar) = CacheMetadataSidecar::load(&self.base) else {
            return;
        };
        if let Some(entry) = sidecar.0.get_mut(name) {
            entry.last_accessed = Utc::now();
            let _ = sidecar.save(&self.base);
        }
    }

    /// Archives `source_path` to `<cacheBase>/<name>.tar.gz.tmp` then
    /// atomically renames it into place. No-op if `source_path` is absent.
    pub fn save(&self, name: &str, source_path: &Path) -> CacheResult<()> {
        if !source_path.exists() {
            return Ok(());
        }

        let entry_name = source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());

        let mut gz_bytes = Vec::new();
        {
            let encoder = GzEncoder::new(&mut gz_bytes, Compression::default());
            let mut builder = tar::Builder::new(encoder);
            if source_path.is_dir() {
                builder.append_dir_all(&entry_name, source_path)?;
            } else {
                builder.append_path_with_name(source_path, &entry_name)?;
            }
            builder.into_inner()?.finish()?;
        }

        let archive_path = self.archive_path(name);
        write_atomic(&archive_path, &gz_bytes)?;

        let now = Utc::now();
        let mut sidecar = CacheMetadataSidecar::load(&self.base)?;
        sidecar.0.insert(
            name.to_string(),
            CacheMetadataEntry {
                name: name.to_string(),
                size: gz_bytes.len() as u64,
                created: now,
                last_accessed: now,
                archive_hash: sha256_file(&archive_path).unwrap_or_default(),
                source_hash: sha256_tree(source_path),
            },
        );
        sidecar.save(&self.base)?;
        info!(cache = name, size = gz_bytes.len(), "cache saved");
        Ok(())
    }

    /// Removes a single archive, or every archive if `name` is `None`. ENOENT
    /// is swallowed.
    pub fn clear_cache(&self, name: Option<&str>) -> CacheResult<()> {
        let mut sidecar = CacheMetadataSidecar::load(&self.base)?;
        match name {
            Some(name) => {
                remove_ignoring_not_found(&self.archive_path(name))?;
                sidecar.0.remove(name);
            }
            None => {
                if let Ok(read_dir) = std::fs::read_dir(&self.base) {
                    for entry in read_dir.flatten() {
                        let path = entry.path();
                        if path.extension().and_then(|e| e.to_str()) == Some("gz") {
                            remove_ignoring_not_found(&path)?;
                        }
                    }
                }
                sidecar.0.clear();
            }
        }
        sidecar.save(&self.base)?;
        Ok(())
    }

    /// Removes caches whose `lastAccessed` is older than `now - max_age`.
    pub fn cleanup_old_caches(&self, max_age: Option<Duration>) -> CacheResult<()> {
        let max_age = chrono::Duration::from_std(max_age.unwrap_or(DEFAULT_MAX_AGE))
            .unwrap_or_else(|_| chrono::Duration::seconds(0));
        let cutoff = Utc::now() - max_age;

        let mut sidecar = CacheMetadataSidecar::load(&self.base)?;
        let stale: Vec<String> = sidecar
            .0
            .iter()
            .filter(|(_, entry)| entry.last_accessed < cutoff)
            .map(|(name, _)| name.clone())
            .collect();

        for name in &stale {
            remove_ignoring_not_found(&self.archive_path(name))?;
            sidecar.0.remove(name);
        }
        sidecar.save(&self.base)?;
        Ok(())
    }
}

fn remove_ignoring_not_found(path: &Path) -> CacheResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(CacheError::Filesystem(err)),
    }
}

#[cfg(test)]
#[path = "cache_store_tests.rs"]
mod tests;
