// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin façade over the Docker Engine API: image pulls, container
//! create/start/wait/logs/remove, and network create/remove.

use crate::error::{RuntimeError, RuntimeResult};
use crate::spec::{ContainerHandle, ContainerSpec, RunOutcome};
use bbpl_core::id::IdGen;
use bollard::auth::DockerCredentials;
use bollard::container::{
    Config, CreateContainerOptions, LogsOptions, RemoveContainerOptions, StartContainerOptions,
    StopContainerOptions, WaitContainerOptions,
};
use bollard::image::CreateImageOptions;
use bollard::models::{HostConfig, PortBinding};
use bollard::network::{CreateNetworkOptions, ListNetworksOptions};
use bollard::Docker;
use futures_util::stream::StreamExt;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info_span, warn, Instrument};

const STOP_TIMEOUT: Duration = Duration::from_secs(10);

/// Tracks every container and network this driver has created, so
/// [`RuntimeDriver::cleanup`] can tear the run down without the caller
/// having to remember what was created.
#[derive(Default)]
struct Tracked {
    containers: Vec<String>,
    networks: Vec<String>,
}

pub struct RuntimeDriver {
    docker: Docker,
    id_gen: Arc<dyn IdGen>,
    tracked: Mutex<Tracked>,
}

impl RuntimeDriver {
    /// Connects to the local Docker daemon over its Unix socket / named pipe.
    pub fn connect(id_gen: Arc<dyn IdGen>) -> RuntimeResult<Self> {
        let docker = Docker::connect_with_local_defaults().map_err(RuntimeError::Connect)?;
        Ok(Self {
            docker,
            id_gen,
            tracked: Mutex::new(Tracked::default()),
        })
    }

    /// Pulls `image_ref`, draining the progress stream until completion.
    /// `auth` carries registry credentials when the image is private.
    pub async fn pull_image(
        &self,
        image_ref: &str,
        auth: Option<(&str, &str)>,
    ) -> RuntimeResult<()> {
        let span = info_span!("pull_image", image = image_ref);
        async {
            let options = CreateImageOptions {
                from_image: image_ref,
                ..Default::default()
            };
            let credentials = auth.map(|(username, password)| DockerCredentials {
                username: Some(username.to_string()),
                password: Some(password.to_string()),
                ..Default::default()
            });
            let mut stream = self.docker.create_image(Some(options), None, credentials);
            while let Some(event) = stream.next().await {
                event?;
            }
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Creates (but does not start) a container for `spec`, returning a
    /// handle carrying its id and synthesized name.
    pub async fn create_container(&self, spec: &ContainerSpec) -> RuntimeResult<ContainerHandle> {
        let random = self.id_gen.next().replace('-', "");
        let suffix = &random[..9.min(random.len())];
        let name = format!("bbpl-{}-{}", epoch_millis(), suffix);

        let env: Vec<String> = spec.env.iter().map(|(k, v)| format!("{k}={v}")).collect();
        let binds: Vec<String> = spec
            .binds
            .iter()
            .map(|b| format!("{}:{}", b.host_path, b.container_path))
            .collect();
        let exposed_ports: HashMap<String, HashMap<(), ()>> = spec
            .exposed_ports
            .iter()
            .map(|p| (p.clone(), HashMap::new()))
            .collect();
        let port_bindings: HashMap<String, Option<Vec<PortBinding>>> = spec
            .port_bindings
            .iter()
            .map(|(port, hosts)| {
                let bindings = hosts
                    .iter()
                    .map(|(host_ip, host_port)| PortBinding {
                        host_ip: Some(host_ip.clone()),
                        host_port: Some(host_port.clone()),
                    })
                    .collect();
                (port.clone(), Some(bindings))
            })
            .collect();

        let host_config = HostConfig {
            binds: if binds.is_empty() { None } else { Some(binds) },
            memory: spec.memory_bytes,
            nano_cpus: spec.nano_cpus,
            network_mode: spec.network_name.clone(),
            port_bindings: if port_bindings.is_empty() {
                None
            } else {
                Some(port_bindings)
            },
            ..Default::default()
        };

        let config = Config {
            image: Some(spec.image.clone()),
            cmd: Some(spec.command.clone()),
            env: Some(env),
            working_dir: Some(spec.working_dir.clone()),
            user: spec.user.clone(),
            exposed_ports: if exposed_ports.is_empty() {
                None
            } else {
                Some(exposed_ports)
            },
            host_config: Some(host_config),
            ..Default::default()
        };

        let options = CreateContainerOptions {
            name: name.clone(),
            platform: None,
        };
        let response = self.docker.create_container(Some(options), config).await?;

        self.tracked.lock().containers.push(response.id.clone());
        Ok(ContainerHandle {
            id: response.id,
            name,
        })
    }

    /// Starts `handle`, follows its combined stdout/stderr, and waits for
    /// it to exit. Never returns `Err` for container-level failures — those
    /// are reported as a [`RunOutcome`] with `exit_code != 0`.
    pub async fn run_container(&self, handle: &ContainerHandle) -> RunOutcome {
        let start = Instant::now();
        match self.run_container_inner(handle).await {
            Ok(outcome) => outcome,
            Err(err) => RunOutcome::driver_failure(err.to_string(), start.elapsed()),
        }
    }

    async fn run_container_inner(&self, handle: &ContainerHandle) -> RuntimeResult<RunOutcome> {
        let start = Instant::now();
        self.docker
            .start_container(&handle.id, None::<StartContainerOptions<String>>)
            .await?;

        let logs_options = LogsOptions::<String> {
            follow: true,
            stdout: true,
            stderr: true,
            ..Default::default()
        };
        let mut log_stream = self.docker.logs(&handle.id, Some(logs_options));
        let mut output = Vec::new();
        while let Some(chunk) = log_stream.next().await {
            match chunk {
                Ok(log) => output.push(log.to_string()),
                Err(err) => {
                    output.push(format!("[log stream error: {err}]"));
                    break;
                }
            }
        }

        let mut wait_stream = self
            .docker
            .wait_container(&handle.id, None::<WaitContainerOptions<String>>);
        let mut exit_code = 0i64;
        let mut error = None;
        match wait_stream.next().await {
            Some(Ok(response)) => exit_code = response.status_code,
            Some(Err(bollard::errors::Error::DockerContainerWaitError { error: msg, code })) => {
                exit_code = code;
                error = Some(msg);
            }
            Some(Err(err)) => {
                exit_code = 1;
                error = Some(err.to_string());
            }
            None => {}
        }

        Ok(RunOutcome {
            exit_code,
            output,
            error,
            duration: start.elapsed(),
        })
    }

    /// Attempts a graceful stop. An "is not running" error is swallowed.
    pub async fn stop_container(&self, id: &str) -> RuntimeResult<()> {
        let options = StopContainerOptions {
            t: STOP_TIMEOUT.as_secs() as i64,
        };
        match self.docker.stop_container(id, Some(options)).await {
            Ok(()) => Ok(()),
            Err(err) if error_message(&err).contains("is not running") => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Force-removes a container.
    pub async fn remove_container(&self, id: &str) -> RuntimeResult<()> {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };
        self.docker.remove_container(id, Some(options)).await?;
        self.tracked.lock().containers.retain(|c| c != id);
        Ok(())
    }

    /// Idempotently creates a bridge network, returning its id. If a
    /// network of that name already exists, returns its id instead of
    /// creating a duplicate.
    pub async fn create_network(&self, name: &str) -> RuntimeResult<String> {
        let mut filters = HashMap::new();
        filters.insert("name".to_string(), vec![name.to_string()]);
        let existing = self
            .docker
            .list_networks(Some(ListNetworksOptions { filters }))
            .await?;
        if let Some(network) = existing
            .into_iter()
            .find(|n| n.name.as_deref() == Some(name))
        {
            if let Some(id) = network.id {
                return Ok(id);
            }
        }

        let options = CreateNetworkOptions {
            name,
            check_duplicate: true,
            driver: "bridge",
            ..Default::default()
        };
        let response = self.docker.create_network(options).await?;
        let id = response.id.unwrap_or_else(|| name.to_string());
        self.tracked.lock().networks.push(id.clone());
        Ok(id)
    }

    /// Removes a network. An "has active endpoints" error is downgraded to
    /// a warning rather than propagated.
    pub async fn remove_network(&self, id: &str) -> RuntimeResult<()> {
        match self.docker.remove_network(id).await {
            Ok(()) => {
                self.tracked.lock().networks.retain(|n| n != id);
                Ok(())
            }
            Err(err) if error_message(&err).contains("has active endpoints") => {
                warn!(network = id, "network still has active endpoints");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Stops and removes every container this driver created, then removes
    /// every tracked network except `keep_network`.
    pub async fn cleanup(&self, keep_network: Option<&str>) {
        let (containers, networks) = {
            let tracked = self.tracked.lock();
            (tracked.containers.clone(), tracked.networks.clone())
        };

        for container in containers {
            let _ = self.stop_container(&container).await;
            if let Err(err) = self.remove_container(&container).await {
                warn!(container = container, error = %err, "failed to remove container during cleanup");
            }
        }

        for network in networks {
            if Some(network.as_str()) == keep_network {
                continue;
            }
            if let Err(err) = self.remove_network(&network).await {
                warn!(network = network, error = %err, "failed to remove network during cleanup");
            }
        }
    }
}

fn error_message(err: &bollard::errors::Error) -> String {
    err.to_string()
}

fn epoch_millis() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
