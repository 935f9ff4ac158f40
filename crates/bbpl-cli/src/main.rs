// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! bbpl - runs a bitbucket-pipelines.yml pipeline locally against Docker.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod output;

use anyhow::{Context, Result};
use bbpl_core::RunnerConfig;
use bbpl_engine::{EngineFacade, Selection};
use clap::{Parser, Subcommand};
use output::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "bbpl",
    version,
    about = "Runs a bitbucket-pipelines.yml pipeline locally against Docker"
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    /// Raise logging to debug
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Directory containing bitbucket-pipelines.yml (default: current directory)
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a pipeline
    Run {
        /// Select the pipeline mapped to this branch name
        #[arg(long)]
        branch: Option<String>,
        /// Select a pipeline under `pipelines.custom`
        #[arg(long)]
        custom: Option<String>,
        /// Select an explicit pipeline id (only `"default"` is valid)
        #[arg(long)]
        pipeline: Option<String>,
        /// Print each step's script instead of executing it
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
    /// Validate the pipeline document without running anything
    Validate,
    /// List every pipeline label in the document
    List,
    /// Remove cached archives and/or artifacts
    ClearCache {
        /// Only clear cached archives
        #[arg(long = "cache-only", conflicts_with = "artifacts_only")]
        cache_only: bool,
        /// Only clear saved artifacts
        #[arg(long = "artifacts-only", conflicts_with = "cache_only")]
        artifacts_only: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = std::env::var("BBPL_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let workspace = match &cli.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let runner_config =
        RunnerConfig::load_layered(&workspace).context("failed to load runner configuration")?;
    let facade = EngineFacade::new(runner_config, &workspace);

    match cli.command {
        Commands::Run {
            branch,
            custom,
            pipeline,
            dry_run,
        } => {
            let selection = Selection {
                branch,
                custom,
                pipeline,
            };
            let result = facade.run(&selection, dry_run).await?;
            output::print_run_result(&result, cli.output);
            Ok(if result.success { 0 } else { 1 })
        }
        Commands::Validate => {
            let (ok, diagnostics) = facade.validate()?;
            output::print_diagnostics(&diagnostics, cli.output);
            Ok(if ok { 0 } else { 1 })
        }
        Commands::List => {
            let labels = facade.list_pipelines()?;
            output::print_labels(&labels, cli.output);
            Ok(0)
        }
        Commands::ClearCache {
            cache_only,
            artifacts_only,
        } => {
            let (clear_cache, clear_artifacts) = match (cache_only, artifacts_only) {
                (false, false) => (true, true),
                (cache, artifacts) => (cache, artifacts),
            };
            facade.clear_cache(clear_cache, clear_artifacts)?;
            Ok(0)
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
