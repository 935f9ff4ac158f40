// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine façade: wires the document loader, validator, selector,
//! scheduler, and the cache/artifact/runtime collaborators into the full
//! run lifecycle exposed to the CLI.

use crate::context::PipelineContext;
use crate::scheduler::{run_pipeline, SchedulerEnv};
use crate::selector::{list_labels, select_pipeline, Selection};
use bbpl_cache::{ArtifactStore, CacheStore};
use bbpl_core::{
    Diagnostic, EngineError, EngineResult, ExecutionResult, IdGen, ItemResult, RunnerConfig,
    Severity, UuidIdGen,
};
use bbpl_runtime::RuntimeDriver;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub struct EngineFacade {
    runner_config: RunnerConfig,
    workspace: PathBuf,
}

impl EngineFacade {
    pub fn new(runner_config: RunnerConfig, workspace: impl Into<PathBuf>) -> Self {
        Self {
            runner_config,
            workspace: workspace.into(),
        }
    }

    fn document_path(&self) -> PathBuf {
        self.workspace.join("bitbucket-pipelines.yml")
    }

    /// Loads and validates the pipeline document without running anything.
    /// Returns `false` if any error-severity diagnostic was found.
    pub fn validate(&self) -> EngineResult<(bool, Vec<Diagnostic>)> {
        let document = bbpl_document::load_document(&self.document_path())
            .map_err(|err| EngineError::Parse(err.to_string()))?;
        let diagnostics = bbpl_document::validate(&document);
        let ok = !diagnostics.iter().any(|d| d.severity == Severity::Error);
        Ok((ok, diagnostics))
    }

    /// Lists every pipeline label in the document.
    pub fn list_pipelines(&self) -> EngineResult<Vec<String>> {
        let document = bbpl_document::load_document(&self.document_path())
            .map_err(|err| EngineError::Parse(err.to_string()))?;
        Ok(list_labels(&document))
    }

    /// Removes cached archives and/or artifacts.
    pub fn clear_cache(&self, clear_cache: bool, clear_artifacts: bool) -> EngineResult<()> {
        if clear_cache {
            let store = CacheStore::new(&self.runner_config.cache_dir);
            store
                .clear_cache(None)
                .map_err(|err| EngineError::Filesystem(err.to_string()))?;
        }
        if clear_artifacts {
            let store = ArtifactStore::new(&self.runner_config.artifact_dir, true);
            store
                .clear_artifacts()
                .map_err(|err| EngineError::Filesystem(err.to_string()))?;
        }
        Ok(())
    }

    /// Runs the full lifecycle: load, validate, select, assemble context,
    /// prepare directories, create the shared network, drive the
    /// scheduler, and always clean up afterwards.
    pub async fn run(&self, selection: &Selection, dry_run: bool) -> EngineResult<ExecutionResult> {
        let start = Instant::now();
        let document = bbpl_document::load_document(&self.document_path())
            .map_err(|err| EngineError::Parse(err.to_string()))?;

        let diagnostics = bbpl_document::validate(&document);
        for diagnostic in &diagnostics {
            match diagnostic.severity {
                Severity::Error => warn!(path = diagnostic.path.as_str(), "{}", diagnostic.message),
                Severity::Warning => {
                    info!(path = diagnostic.path.as_str(), "{}", diagnostic.message)
                }
            }
        }
        if diagnostics.iter().any(|d| d.severity == Severity::Error) {
            return Err(EngineError::Validation(format!(
                "{} validation error(s)",
                diagnostics
                    .iter()
                    .filter(|d| d.severity == Severity::Error)
                    .count()
            )));
        }

        let selected = select_pipeline(&document, selection)?;
        let pipeline = selected.pipeline.clone();
        let label = selected.label.clone();
        let max_time = document
            .options
            .as_ref()
            .and_then(|options| options.max_time)
            .map(|minutes| Duration::from_secs_f64((minutes * 60.0).max(0.0)));
        let document = Arc::new(document);

        ensure_dir(&self.workspace)?;
        ensure_dir(&self.runner_config.cache_dir)?;
        ensure_dir(&self.runner_config.artifact_dir)?;

        let id_gen: Arc<dyn IdGen + Send + Sync> = Arc::new(UuidIdGen);
        let context = PipelineContext::for_local_run(
            &self.workspace,
            selection.branch.clone(),
            id_gen.as_ref(),
        );

        // A dry run never touches a container, so it never needs Docker
        // reachable at all.
        let connected = if dry_run {
            None
        } else {
            let runtime = Arc::new(
                RuntimeDriver::connect(id_gen.clone())
                    .map_err(|err| EngineError::Docker(err.to_string()))?,
            );
            let network_id = runtime
                .create_network(&self.runner_config.network_name)
                .await
                .map_err(|err| EngineError::Network(err.to_string()))?;
            Some((runtime, network_id))
        };
        let runtime = connected.as_ref().map(|(runtime, _)| runtime.clone());

        let cancel = CancellationToken::new();
        let env = Arc::new(SchedulerEnv {
            cache_store: Arc::new(CacheStore::new(&self.runner_config.cache_dir)),
            artifact_store: Arc::new(ArtifactStore::new(
                &self.runner_config.artifact_dir,
                self.runner_config.artifacts_enabled,
            )),
            runtime,
            runner_config: Arc::new(self.runner_config.clone()),
            context: Arc::new(context),
            document,
            workspace: self.workspace.clone(),
            network_name: self.runner_config.network_name.clone(),
            id_gen,
            dry_run,
            cancel: cancel.clone(),
        });

        let outcome = run_cancellable(&env, &pipeline, max_time).await;
        if let Some((runtime, network_id)) = connected {
            runtime.cleanup(Some(&network_id)).await;
        }

        let items = match outcome {
            RunStop::Completed(items) => items,
            RunStop::TimedOut(duration, _items) => {
                return Err(EngineError::Timeout(duration));
            }
            RunStop::UserCancelled(_items) => {
                return Err(EngineError::UserCancelled);
            }
        };

        let success = items.iter().all(|item| item.success());
        Ok(ExecutionResult {
            success,
            pipeline_label: label,
            items,
            duration: start.elapsed(),
        })
    }
}

enum RunStop {
    Completed(Vec<ItemResult>),
    TimedOut(Duration, Vec<ItemResult>),
    UserCancelled(Vec<ItemResult>),
}

/// Drives the scheduler to completion, racing it against an optional
/// run-wide `maxTime` deadline and a SIGINT handler. Either trigger flips
/// `env.cancel`, which the scheduler observes cooperatively, and this still
/// waits for the in-flight work to wind down so the caller's cleanup runs
/// against a quiesced run.
async fn run_cancellable(
    env: &Arc<SchedulerEnv>,
    pipeline: &bbpl_core::Pipeline,
    max_time: Option<Duration>,
) -> RunStop {
    let handle = tokio::spawn({
        let env = env.clone();
        let pipeline = pipeline.clone();
        async move { run_pipeline(&env, &pipeline).await }
    });
    tokio::pin!(handle);

    let deadline = async {
        match max_time {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    tokio::select! {
        biased;
        _ = tokio::signal::ctrl_c() => {
            warn!("received interrupt, cancelling in-flight steps");
            env.cancel.cancel();
            RunStop::UserCancelled(handle.await.unwrap_or_default())
        }
        () = &mut deadline => {
            let duration = max_time.unwrap_or_default();
            warn!(?duration, "pipeline exceeded maxTime, cancelling in-flight steps");
            env.cancel.cancel();
            RunStop::TimedOut(duration, handle.await.unwrap_or_default())
        }
        result = &mut handle => RunStop::Completed(result.unwrap_or_default()),
    }
}

fn ensure_dir(path: &Path) -> EngineResult<()> {
    std::fs::create_dir_all(path).map_err(EngineError::Io)
}

#[cfg(test)]
#[path = "facade_tests.rs"]
mod tests;
