// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner configuration: the global, merged view of how this engine talks to
//! the container runtime and where it keeps caches/artifacts.

use crate::error::{EngineError, EngineResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A single resource-limit table entry: size -> limit string (e.g. "2g", "4").
pub type LimitTable = BTreeMap<String, String>;

/// Fully resolved runner configuration (after layering).
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub docker_socket: String,
    pub default_image: String,
    pub network_name: String,
    pub memory_limits: LimitTable,
    pub cpu_limits: LimitTable,
    pub cache_dir: PathBuf,
    pub artifact_dir: PathBuf,
    pub log_level: String,
    pub verbose: bool,
    pub default_variables: BTreeMap<String, String>,
    pub artifacts_enabled: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        let home = dirs_home();
        let mut memory_limits = LimitTable::new();
        memory_limits.insert("1x".into(), "1g".into());
        memory_limits.insert("2x".into(), "2g".into());
        memory_limits.insert("4x".into(), "4g".into());
        memory_limits.insert("8x".into(), "8g".into());
        memory_limits.insert("16x".into(), "16g".into());

        let mut cpu_limits = LimitTable::new();
        cpu_limits.insert("1x".into(), "1".into());
        cpu_limits.insert("2x".into(), "2".into());
        cpu_limits.insert("4x".into(), "4".into());
        cpu_limits.insert("8x".into(), "8".into());
        cpu_limits.insert("16x".into(), "16".into());

        Self {
            docker_socket: "/var/run/docker.sock".into(),
            default_image: "atlassian/default-image".into(),
            network_name: "bbpl-network".into(),
            memory_limits,
            cpu_limits,
            cache_dir: home.join(".bitbucket-pipelines-local").join("cache"),
            artifact_dir: home.join(".bitbucket-pipelines-local").join("artifacts"),
            log_level: "info".into(),
            verbose: false,
            default_variables: BTreeMap::new(),
            artifacts_enabled: true,
        }
    }
}

fn dirs_home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// A partial configuration layer, as read from a config file or overrides.
/// `None` fields fall through to the next, lower-priority layer.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct RunnerConfigFile {
    #[serde(default, rename = "dockerSocket")]
    pub docker_socket: Option<String>,
    #[serde(default, rename = "defaultImage")]
    pub default_image: Option<String>,
    #[serde(default, rename = "networkName")]
    pub network_name: Option<String>,
    #[serde(default, rename = "memoryLimits")]
    pub memory_limits: Option<LimitTable>,
    #[serde(default, rename = "cpuLimits")]
    pub cpu_limits: Option<LimitTable>,
    #[serde(default, rename = "cacheDir")]
    pub cache_dir: Option<PathBuf>,
    #[serde(default, rename = "artifactDir")]
    pub artifact_dir: Option<PathBuf>,
    #[serde(default, rename = "logLevel")]
    pub log_level: Option<String>,
    #[serde(default)]
    pub verbose: Option<bool>,
    #[serde(default, rename = "variables")]
    pub default_variables: Option<BTreeMap<String, String>>,
    #[serde(default, rename = "artifactsEnabled")]
    pub artifacts_enabled: Option<bool>,
}

impl RunnerConfig {
    /// Apply a layer on top of `self`; non-`None` fields in `layer` win, maps merge
    /// key-by-key (right-biased), everything else replaces outright.
    pub fn apply(mut self, layer: RunnerConfigFile) -> Self {
        if let Some(v) = layer.docker_socket {
            self.docker_socket = v;
        }
        if let Some(v) = layer.default_image {
            self.default_image = v;
        }
        if let Some(v) = layer.network_name {
            self.network_name = v;
        }
        if let Some(v) = layer.memory_limits {
            self.memory_limits.extend(v);
        }
        if let Some(v) = layer.cpu_limits {
            self.cpu_limits.extend(v);
        }
        if let Some(v) = layer.cache_dir {
            self.cache_dir = v;
        }
        if let Some(v) = layer.artifact_dir {
            self.artifact_dir = v;
        }
        if let Some(v) = layer.log_level {
            self.log_level = v;
        }
        if let Some(v) = layer.verbose {
            self.verbose = v;
        }
        if let Some(v) = layer.default_variables {
            self.default_variables.extend(v);
        }
        if let Some(v) = layer.artifacts_enabled {
            self.artifacts_enabled = v;
        }
        self
    }

    /// Builds the fully-merged configuration: built-in defaults, then the
    /// global config file, then the project-local one, then `BBPL_`-prefixed
    /// environment variables. Missing files are skipped; a
    /// present-but-malformed file is an error.
    pub fn load_layered(cwd: &Path) -> EngineResult<Self> {
        let mut config = Self::default();
        let home = dirs_home();

        if let Some(layer) =
            read_layer(&home.join(".bitbucket-pipelines-local").join("config.yml"))?
        {
            config = config.apply(layer);
        }
        if let Some(layer) = read_layer(&cwd.join(".bitbucket-pipelines-local.yml"))? {
            config = config.apply(layer);
        }
        config = config.apply(env_layer());
        Ok(config)
    }
}

fn read_layer(path: &Path) -> EngineResult<Option<RunnerConfigFile>> {
    match std::fs::read_to_string(path) {
        Ok(text) => serde_yaml::from_str(&text)
            .map(Some)
            .map_err(|err| EngineError::Parse(format!("{}: {err}", path.display()))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(EngineError::Io(err)),
    }
}

fn env_layer() -> RunnerConfigFile {
    let verbose = std::env::var("BBPL_VERBOSE")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"));

    RunnerConfigFile {
        docker_socket: std::env::var("BBPL_DOCKER_SOCKET").ok(),
        default_image: std::env::var("BBPL_DOCKER_IMAGE").ok(),
        log_level: std::env::var("BBPL_LOG_LEVEL").ok(),
        verbose,
        cache_dir: std::env::var_os("BBPL_CACHE_DIR").map(PathBuf::from),
        artifact_dir: std::env::var_os("BBPL_ARTIFACT_DIR").map(PathBuf::from),
        ..Default::default()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
