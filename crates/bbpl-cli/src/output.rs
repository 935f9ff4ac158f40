// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use bbpl_core::{Diagnostic, ExecutionResult, ItemResult, StepResult};
use clap::ValueEnum;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn print_run_result(result: &ExecutionResult, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(result),
        OutputFormat::Text => {
            for item in &result.items {
                print_item(item);
            }
            let verdict = if result.success {
                "succeeded"
            } else {
                "failed"
            };
            println!(
                "\npipeline {} {verdict} in {:.1}s",
                result.pipeline_label,
                result.duration.as_secs_f64()
            );
            if let Some(name) = result.first_failure() {
                println!("first failure: {name}");
            }
        }
    }
}

fn print_item(item: &ItemResult) {
    match item {
        ItemResult::Step(step) => print_step(step),
        ItemResult::Parallel(group) => {
            println!("parallel ({} steps):", group.children.len());
            for step in &group.children {
                print!("  ");
                print_step(step);
            }
        }
    }
}

fn print_step(step: &StepResult) {
    let mark = if step.success() { "ok" } else { "FAIL" };
    println!(
        "[{mark}] {} ({:.1}s, exit {})",
        step.name,
        step.duration.as_secs_f64(),
        step.exit_code
            .map_or("-".to_string(), |code| code.to_string())
    );
    if let Some(error) = &step.error {
        println!("       {error}");
    }
}

pub fn print_diagnostics(diagnostics: &[Diagnostic], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(diagnostics),
        OutputFormat::Text => {
            if diagnostics.is_empty() {
                println!("no diagnostics");
                return;
            }
            for diagnostic in diagnostics {
                println!(
                    "{:?}: {} ({})",
                    diagnostic.severity, diagnostic.message, diagnostic.path
                );
            }
        }
    }
}

pub fn print_labels(labels: &[String], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(labels),
        OutputFormat::Text => {
            for label in labels {
                println!("{label}");
            }
        }
    }
}

fn print_json(value: &(impl serde::Serialize + ?Sized)) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("failed to serialize output: {err}"),
    }
}
