// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SHA-256 hashing for cache archives and source trees.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Hashes the raw bytes of a file (used for `archiveHash`).
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex(hasher.finalize().as_slice()))
}

/// Hashes a source tree for `sourceHash`: walks `root` in sorted directory
/// order, hashing each entry's name followed by its file contents (files) or
/// recursing (directories). I/O errors on individual entries are skipped
/// silently so one unreadable file doesn't abort the whole hash.
pub fn sha256_tree(root: &Path) -> String {
    let mut hasher = Sha256::new();
    hash_tree_into(root, &mut hasher);
    hex(hasher.finalize().as_slice())
}

fn hash_tree_into(path: &Path, hasher: &mut Sha256) {
    if path.is_dir() {
        let Ok(read_dir) = std::fs::read_dir(path) else {
            return;
        };
        let mut entries: Vec<_> = read_dir.flatten().collect();
        entries.sort_by_key(|entry| entry.file_name());
        for entry in entries {
            hasher.update(entry.file_name().to_string_lossy().as_bytes());
            hash_tree_into(&entry.path(), hasher);
        }
    } else if let Ok(bytes) = std::fs::read(path) {
        hasher.update(&bytes);
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
#[path = "hash_tests.rs"]
mod tests;
