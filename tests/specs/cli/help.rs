//! CLI help and usage output specs.

use crate::prelude::*;

#[test]
fn no_args_shows_usage_and_exits_nonzero() {
    cli().fails().stderr_has("Usage:");
}

#[test]
fn help_flag_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn run_help_shows_options() {
    cli()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("--branch")
        .stdout_has("--dry-run");
}

#[test]
fn clear_cache_help_shows_options() {
    cli()
        .args(&["clear-cache", "--help"])
        .passes()
        .stdout_has("--cache-only")
        .stdout_has("--artifacts-only");
}

#[test]
fn version_flag_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}
