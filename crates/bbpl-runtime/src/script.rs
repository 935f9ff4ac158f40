// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds the single `/bin/bash -c` argument a step's container runs.

/// Directory the workspace is bind-mounted at inside every step container.
pub const WORKSPACE_MOUNT: &str = "/opt/atlassian/pipelines/agent/build";

const SCRIPT_PATH: &str = "/tmp/bbpl-script.sh";
const AFTER_SCRIPT_PATH: &str = "/tmp/bbpl-after-script.sh";

/// Wraps `text` in single quotes, escaping embedded single quotes as `'\''`.
fn single_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "'\\''"))
}

/// Builds the bash command that writes the step's script (and, if present,
/// its after-script) to disk, makes it executable, and runs it.
///
/// When `after_script` is non-empty the main script's exit code is preserved:
/// `($SCRIPT; ec=$?; $AFTER; exit $ec)`.
pub fn build_command(script: &[String], after_script: &[String]) -> Vec<String> {
    let script_text = script.join("\n");
    let write_script = format!(
        "printf %s {} > {} && chmod +x {}",
        single_quote(&script_text),
        SCRIPT_PATH,
        SCRIPT_PATH
    );

    let inline = if after_script.is_empty() {
        format!("{write_script} && {SCRIPT_PATH}")
    } else {
        let after_text = after_script.join("\n");
        let write_after = format!(
            "printf %s {} > {} && chmod +x {}",
            single_quote(&after_text),
            AFTER_SCRIPT_PATH,
            AFTER_SCRIPT_PATH
        );
        format!(
            "{write_script} && {write_after} && ({SCRIPT_PATH}; ec=$?; {AFTER_SCRIPT_PATH}; exit $ec)"
        )
    };

    vec!["/bin/bash".to_string(), "-c".to_string(), inline]
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
