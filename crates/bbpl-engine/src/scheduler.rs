// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Walks a selected pipeline, dispatching sequential steps and parallel
//! groups with fail-fast cancellation, and aggregates results.

use crate::container_spec::build_container_spec;
use crate::context::PipelineContext;
use crate::environment::{assemble, EnvironmentInputs, ParallelMarker};
use bbpl_cache::{resolve_cache_path, ArtifactStore, CacheStore};
use bbpl_core::{
    Document, IdGen, ItemResult, ParallelResult, Pipeline, PipelineItem, RunnerConfig, Step,
    StepResult, StepState,
};
use bbpl_runtime::{ContainerHandle, ContainerSpec, RunOutcome, RuntimeDriver};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};

/// Turns a step's (or the pipeline's) `maxTime` minutes into a wall-clock
/// duration, clamping negative values to zero.
fn minutes_to_duration(minutes: f64) -> Duration {
    Duration::from_secs_f64((minutes * 60.0).max(0.0))
}

/// Spacing applied between sequential pipeline items.
const ITEM_SPACING: Duration = Duration::from_millis(100);

static EXECUTION_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_execution_id() -> String {
    format!("exec-{}", EXECUTION_COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Everything a step execution needs, shared (via `Arc`) across every
/// concurrently-spawned step task in the run.
pub struct SchedulerEnv {
    pub cache_store: Arc<CacheStore>,
    pub artifact_store: Arc<ArtifactStore>,
    /// `None` only when `dry_run` is set: a dry run never needs a reachable
    /// container runtime, so the façade skips connecting to Docker entirely.
    pub runtime: Option<Arc<RuntimeDriver>>,
    pub runner_config: Arc<RunnerConfig>,
    pub context: Arc<PipelineContext>,
    /// The loaded document, carried through so step execution can resolve
    /// the document-level default `image:` and `options.size`.
    pub document: Arc<Document>,
    pub workspace: PathBuf,
    pub network_name: String,
    pub id_gen: Arc<dyn IdGen + Send + Sync>,
    pub dry_run: bool,
    /// Flipped by the run-wide `maxTime` deadline or a SIGINT handler; every
    /// in-flight step and parallel group observes it and cancels
    /// cooperatively.
    pub cancel: CancellationToken,
}

/// Runs every item of `pipeline` in order, short-circuiting after the first
/// failing item or once the run has been cancelled. Returns the ordered
/// per-item results produced before the stop.
pub async fn run_pipeline(env: &Arc<SchedulerEnv>, pipeline: &Pipeline) -> Vec<ItemResult> {
    let mut results = Vec::new();
    let items = pipeline.items();

    for (index, item) in items.iter().enumerate() {
        if env.cancel.is_cancelled() {
            break;
        }

        let item_result = match item {
            PipelineItem::Step(step) => {
                ItemResult::Step(run_step(env.clone(), step.clone(), None).await)
            }
            PipelineItem::Parallel(group) => ItemResult::Parallel(
                run_parallel_group(env, group.steps.clone(), group.fail_fast).await,
            ),
        };

        let succeeded = item_result.success();
        results.push(item_result);

        if !succeeded {
            break;
        }
        if index + 1 < items.len() {
            tokio::time::sleep(ITEM_SPACING).await;
        }
    }

    results
}

async fn run_parallel_group(
    env: &Arc<SchedulerEnv>,
    steps: Vec<Step>,
    fail_fast: bool,
) -> ParallelResult {
    let cancel = env.cancel.child_token();
    let marker = ParallelMarker { count: steps.len() };
    let mut tasks = Vec::with_capacity(steps.len());

    for (index, step) in steps.into_iter().enumerate() {
        let env = env.clone();
        let child_cancel = cancel.clone();
        tasks.push(tokio::spawn(async move {
            let name = step.display_name();
            let result = tokio::select! {
                biased;
                () = child_cancel.cancelled() => StepResult::cancelled(name),
                result = run_step(env, step, Some(marker)) => result,
            };
            (index, result)
        }));
    }

    let mut children: Vec<Option<StepResult>> = (0..tasks.len()).map(|_| None).collect();
    let mut remaining: Vec<_> = tasks.into_iter().collect();
    while !remaining.is_empty() {
        let (outcome, _idx, rest) = futures_util::future::select_all(remaining).await;
        remaining = rest;
        match outcome {
            Ok((index, result)) => {
                let failed = !result.success();
                children[index] = Some(result);
                if fail_fast && failed {
                    cancel.cancel();
                }
            }
            Err(join_err) => {
                warn!(error = %join_err, "step task panicked");
            }
        }
    }

    ParallelResult {
        failed_fast: fail_fast,
        children: children
            .into_iter()
            .map(|r| r.unwrap_or_else(|| StepResult::cancelled("(unknown step)")))
            .collect(),
    }
}

async fn run_step(
    env: Arc<SchedulerEnv>,
    step: Step,
    parallel: Option<ParallelMarker>,
) -> StepResult {
    let name = step.display_name();
    let span = info_span!("step", name = %name);
    run_step_inner(&env, &step, parallel).instrument(span).await
}

async fn run_step_inner(
    env: &SchedulerEnv,
    step: &Step,
    parallel: Option<ParallelMarker>,
) -> StepResult {
    let name = step.display_name();
    let start = Instant::now();

    if env.dry_run {
        info!("dry run: skipping execution");
        return StepResult {
            name,
            state: StepState::Succeeded,
            exit_code: Some(0),
            output: step.script.clone(),
            duration: start.elapsed(),
            error: None,
        };
    }

    for cache_name in &step.caches {
        let target = resolve_cache_path(cache_name, &env.workspace);
        let hit = env.cache_store.restore(cache_name, &target);
        info!(cache = cache_name.as_str(), hit, "cache restore");
    }

    env.artifact_store.restore(&env.workspace, None);

    let step_uuid = format!("{{{}}}", env.id_gen.next());
    let execution_id = next_execution_id();
    let env_inputs = EnvironmentInputs {
        context: &env.context,
        runner_config: &env.runner_config,
        cwd: &env.workspace,
        user_env_file: None,
        step_variables: &step.variables,
        step_uuid: &step_uuid,
        parallel,
        execution_id: &execution_id,
        execution_timestamp: Utc::now(),
    };
    let (variables, invalid_names) = assemble(&env_inputs);
    for invalid in &invalid_names {
        warn!(name = invalid.as_str(), "invalid environment variable name");
    }

    let spec: ContainerSpec = build_container_spec(
        step,
        &env.document,
        &env.runner_config,
        &env.network_name,
        &env.workspace,
        variables,
    );

    let timeout = step.max_time.map(minutes_to_duration);

    let outcome = run_with_optional_timeout(env, &spec, timeout).await;
    let success = outcome.exit_code == 0;

    if success {
        for cache_name in &step.caches {
            let source = resolve_cache_path(cache_name, &env.workspace);
            if let Err(err) = env.cache_store.save(cache_name, &source) {
                warn!(cache = cache_name.as_str(), error = %err, "cache save failed");
            }
        }
        if let Some(artifacts) = &step.artifacts {
            if let Err(err) = env
                .artifact_store
                .save(&artifacts.paths, &env.workspace, &name)
            {
                warn!(error = %err, "artifact save failed");
            }
        }
    }

    StepResult {
        name,
        state: if success {
            StepState::Succeeded
        } else {
            StepState::Failed
        },
        exit_code: Some(outcome.exit_code),
        output: outcome.output,
        duration: outcome.duration,
        error: outcome.error,
    }
}

async fn run_with_optional_timeout(
    env: &SchedulerEnv,
    spec: &ContainerSpec,
    timeout: Option<Duration>,
) -> RunOutcome {
    let start = Instant::now();
    let Some(runtime) = env.runtime.as_ref() else {
        return RunOutcome::driver_failure(
            "no container runtime connected".to_string(),
            start.elapsed(),
        );
    };
    let handle = match runtime.create_container(spec).await {
        Ok(handle) => handle,
        Err(err) => return RunOutcome::driver_failure(err.to_string(), start.elapsed()),
    };

    let run_future = run_to_completion(runtime, &handle);
    let outcome = tokio::select! {
        biased;
        () = env.cancel.cancelled() => {
            let _ = runtime.stop_container(&handle.id).await;
            RunOutcome::driver_failure("step cancelled".to_string(), start.elapsed())
        }
        outcome = run_timed(run_future, timeout) => match outcome {
            Ok(outcome) => outcome,
            Err(duration) => {
                let _ = runtime.stop_container(&handle.id).await;
                RunOutcome::driver_failure(
                    format!("step timed out after {duration:?}"),
                    start.elapsed(),
                )
            }
        },
    };

    if let Err(err) = runtime.remove_container(&handle.id).await {
        warn!(container = handle.id.as_str(), error = %err, "failed to remove container");
    }

    outcome
}

async fn run_to_completion(runtime: &RuntimeDriver, handle: &ContainerHandle) -> RunOutcome {
    runtime.run_container(handle).await
}

/// Awaits `future`, bounding it by `timeout` when one is given. `Err` carries
/// the duration that elapsed so the caller can report it.
async fn run_timed(
    future: impl std::future::Future<Output = RunOutcome>,
    timeout: Option<Duration>,
) -> Result<RunOutcome, Duration> {
    match timeout {
        Some(duration) => tokio::time::timeout(duration, future)
            .await
            .map_err(|_| duration),
        None => Ok(future.await),
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
