// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dotenv-style file parsing, shared by every layer of the Environment
//! Assembler that reads `key=value` files.

use std::collections::BTreeMap;
use std::path::Path;

/// Parses `key=value` lines, skipping blank lines and `#`-comments. The
/// first `=` in a line splits key from value; surrounding whitespace on
/// both sides is trimmed.
pub fn parse_env_text(text: &str) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        vars.insert(key.trim().to_string(), value.trim().to_string());
    }
    vars
}

/// Reads and parses an env file. Returns an empty map if the file doesn't
/// exist.
pub fn read_env_file(path: &Path) -> BTreeMap<String, String> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_env_text(&text),
        Err(_) => BTreeMap::new(),
    }
}

#[cfg(test)]
#[path = "env_files_tests.rs"]
mod tests;
