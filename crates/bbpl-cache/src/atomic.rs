// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! write-tmp, fsync, rename, fsync-dir: the same publish sequence used for
//! every crash-safe write in this crate (cache archives, artifact sidecars).

use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Atomically publishes `data` at `path`. The write lands at `path` with a
/// `.tmp` suffix first, is fsynced, then renamed into place; the parent
/// directory is fsynced last so the rename itself is durable.
pub fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let tmp_path = path.with_extension(append_tmp_extension(path));
    let mut tmp_file = File::create(&tmp_path)?;
    tmp_file.write_all(data)?;
    tmp_file.sync_all()?;

    std::fs::rename(&tmp_path, path)?;

    let dir = File::open(parent)?;
    dir.sync_all()?;
    Ok(())
}

fn append_tmp_extension(path: &Path) -> String {
    match path.extension() {
        Some(ext) => format!("{}.tmp", ext.to_string_lossy()),
        None => "tmp".into(),
    }
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
