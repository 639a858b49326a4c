// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container-backed build hosts.
//!
//! Acquires a host by starting a long-lived container from the image
//! configured for the requested OS; releases it with a forced remove
//! that tolerates a container that is already gone.

use super::{BuildHost, Builder, BuilderArgs, BuilderError, BuilderFactory};
use crate::config::{ImageSpec, PluginsConfig};
use crate::provisioner::provisioner_for_os;
use crate::registry::{Registry, RegistryError};
use crate::subprocess::{run_with_timeout, RUNTIME_CLI_TIMEOUT};
use crate::transport::Transport;
use async_trait::async_trait;
use rig_core::Environment;
use std::sync::Arc;
use tokio::process::Command;

/// Name this builder is registered under.
pub const PLUGIN_NAME: &str = "container";

/// Transport names a container host supports, most preferred first.
const HOST_TRANSPORTS: &[&str] = &["container"];

/// Register the container builder.
pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_builder(PLUGIN_NAME, Arc::new(ContainerBuilderFactory))
}

struct ContainerBuilderFactory;

impl BuilderFactory for ContainerBuilderFactory {
    fn create(&self, args: BuilderArgs) -> Result<Box<dyn Builder>, BuilderError> {
        let image = args
            .config
            .images
            .get(&args.os)
            .cloned()
            .ok_or_else(|| BuilderError::NoHost(format!("no image configured for os {}", args.os)))?;
        Ok(Box::new(ContainerBuilder {
            os: args.os,
            image,
            config: args.config,
            registry: args.registry,
        }))
    }
}

/// Builder that runs build hosts as containers.
pub struct ContainerBuilder {
    os: String,
    image: ImageSpec,
    config: PluginsConfig,
    registry: Arc<Registry>,
}

impl ContainerBuilder {
    fn runtime_command(&self, tail: &[&str]) -> Command {
        let mut cmd = Command::new(&self.config.container.binary);
        if let Some(endpoint) = &self.config.container.endpoint {
            cmd.args(["-H", endpoint]);
        }
        cmd.args(tail);
        cmd
    }
}

#[async_trait]
impl Builder for ContainerBuilder {
    async fn get(&self) -> Result<BuildHost, BuilderError> {
        let run = self.runtime_command(&["run", "-d", &self.image.image, "sleep", "infinity"]);
        let output = run_with_timeout(run, RUNTIME_CLI_TIMEOUT, "container run")
            .await
            .map_err(BuilderError::NoHost)?;
        if !output.status.success() {
            return Err(BuilderError::NoHost(format!(
                "could not start {}: {}",
                self.image.image,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let container_id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if container_id.is_empty() {
            return Err(BuilderError::NoHost(
                "runtime returned no container id".to_string(),
            ));
        }

        let short_id = &container_id[..container_id.len().min(12)];
        tracing::info!(os = %self.os, container = short_id, "acquired build host");

        Ok(BuildHost {
            hostname: format!("rig-{}", short_id),
            os: self.os.clone(),
            release: self.image.release.clone(),
            transports: HOST_TRANSPORTS.iter().map(|t| t.to_string()).collect(),
            address: container_id,
            // Build containers run their exec sessions as root.
            username: "root".to_string(),
            credential: None,
        })
    }

    async fn prepare(
        &self,
        transport: &dyn Transport,
        host: &BuildHost,
        environment: &Environment,
    ) -> Result<(), BuilderError> {
        let name = provisioner_for_os(&host.os);
        let provisioner = self
            .registry
            .find_provisioner(name)
            .ok_or_else(|| BuilderError::NoProvisioner(host.os.clone()))?;
        provisioner.prepare(transport, host, environment).await?;
        Ok(())
    }

    async fn release(&self, _transport: Option<&dyn Transport>, host: &BuildHost) {
        let rm = self.runtime_command(&["rm", "-f", &host.address]);
        match run_with_timeout(rm, RUNTIME_CLI_TIMEOUT, "container rm").await {
            Ok(output) if output.status.success() => {
                tracing::info!(host = %host.hostname, "released build host");
            }
            // Already gone counts as released; the runner must never fail here.
            Ok(output) => tracing::warn!(
                host = %host.hostname,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "build host release was not clean"
            ),
            Err(e) => tracing::warn!(host = %host.hostname, error = %e, "build host release failed"),
        }
    }
}

#[cfg(test)]
#[path = "container_tests.rs"]
mod tests;
