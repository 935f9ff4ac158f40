// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use clap::CommandFactory;

#[test]
fn cli_definition_is_well_formed() {
    Cli::command().debug_assert();
}

#[test]
fn run_parses_branch_and_dry_run() {
    let cli = Cli::try_parse_from(["bbpl", "run", "--branch", "main", "--dry-run"]).unwrap();
    match cli.command {
        Commands::Run {
            branch, dry_run, ..
        } => {
            assert_eq!(branch.as_deref(), Some("main"));
            assert!(dry_run);
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn clear_cache_rejects_conflicting_flags() {
    let result = Cli::try_parse_from(["bbpl", "clear-cache", "--cache-only", "--artifacts-only"]);
    assert!(result.is_err());
}

#[test]
fn clear_cache_defaults_to_clearing_both() {
    let cli = Cli::try_parse_from(["bbpl", "clear-cache"]).unwrap();
    match cli.command {
        Commands::ClearCache {
            cache_only,
            artifacts_only,
        } => {
            assert!(!cache_only);
            assert!(!artifacts_only);
        }
        _ => panic!("expected ClearCache"),
    }
}

#[test]
fn global_output_flag_applies_before_subcommand() {
    let cli = Cli::try_parse_from(["bbpl", "-o", "json", "list"]).unwrap();
    assert!(matches!(cli.output, OutputFormat::Json));
}
