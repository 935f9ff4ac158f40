// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn plain_script_writes_and_runs_it() {
    let cmd = build_command(&["echo hi".to_string()], &[]);
    assert_eq!(cmd[0], "/bin/bash");
    assert_eq!(cmd[1], "-c");
    assert!(cmd[2].contains(SCRIPT_PATH));
    assert!(cmd[2].ends_with(SCRIPT_PATH));
    assert!(!cmd[2].contains("ec=$?"));
}

#[test]
fn escapes_embedded_single_quotes() {
    let cmd = build_command(&["echo 'hello'".to_string()], &[]);
    assert!(cmd[2].contains("'\\''"));
}

#[test]
fn after_script_preserves_exit_code() {
    let cmd = build_command(&["echo main".to_string()], &["echo after".to_string()]);
    assert!(cmd[2].contains(AFTER_SCRIPT_PATH));
    assert!(cmd[2].contains("ec=$?"));
    assert!(cmd[2].contains("exit $ec"));
}
