// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Debian-family provisioner.
//!
//! Drives apt over the transport: refresh the package index, configure
//! any extra repositories (with optional signing keys), refresh again so
//! the new repositories are visible, then install the requested packages
//! in one command.

use super::{ProvisionError, Provisioner};
use crate::builder::BuildHost;
use crate::registry::{Registry, RegistryError};
use crate::transport::{ExecOpts, Transport};
use async_trait::async_trait;
use rig_core::{Environment, RepoSpec};
use std::sync::Arc;

/// Name this provisioner is registered under.
pub const PLUGIN_NAME: &str = "debian";

/// Sources fragment all added repositories are appended to.
const SOURCES_FRAGMENT: &str = "/etc/apt/sources.list.d/rig.list";

/// Keyserver signing keys are fetched from.
const KEYSERVER: &str = "keyserver.ubuntu.com";

/// Register the Debian provisioner.
pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_provisioner(PLUGIN_NAME, Arc::new(DebianProvisioner))
}

/// Provisioner for apt-based hosts (Debian, Ubuntu).
#[derive(Default)]
pub struct DebianProvisioner;

impl DebianProvisioner {
    pub fn new() -> Self {
        Self
    }

    async fn provision(
        &self,
        transport: &dyn Transport,
        host: &BuildHost,
        environment: &Environment,
    ) -> Result<(), ProvisionError> {
        transport.export_env(&[(
            "DEBIAN_FRONTEND".to_string(),
            "noninteractive".to_string(),
        )]);

        // Hosts may need a refresh before anything can be installed.
        let success = transport
            .exec("apt-get update -qq", &ExecOpts::sudo())
            .await?;
        if !success {
            return Err(ProvisionError::CommandFailed(
                "failed to update package index".to_string(),
            ));
        }

        if let Some(repos) = &environment.repos {
            for repo in repos {
                // Only http/https repositories are supported; others are
                // left for provisioners that understand them.
                if !repo.url.starts_with("http://") && !repo.url.starts_with("https://") {
                    continue;
                }
                self.add_http_repository(transport, repo, host).await?;
            }

            // Refresh again so the new repositories are visible.
            let success = transport
                .exec("apt-get update -q", &ExecOpts::sudo())
                .await?;
            if !success {
                return Err(ProvisionError::CommandFailed(
                    "failed to update package index".to_string(),
                ));
            }
        }

        if let Some(packages) = &environment.packages {
            if !packages.is_empty() {
                let list = packages.join(" ");
                let success = transport
                    .exec(&format!("apt-get install -q -y {}", list), &ExecOpts::sudo())
                    .await?;
                if !success {
                    return Err(ProvisionError::CommandFailed(format!(
                        "failed to install packages {}",
                        list
                    )));
                }
            }
        }

        Ok(())
    }

    async fn add_http_repository(
        &self,
        transport: &dyn Transport,
        repo: &RepoSpec,
        host: &BuildHost,
    ) -> Result<(), ProvisionError> {
        // Hard configuration error, raised before any remote command for
        // this repo.
        let components = repo
            .components
            .as_deref()
            .ok_or_else(|| ProvisionError::MissingComponents {
                url: repo.url.clone(),
            })?;

        let fragment = format!("deb {} {} {}", repo.url, host.release, components);
        let success = transport
            .exec(
                &format!("sh -c \"echo '{}' | tee -a {}\"", fragment, SOURCES_FRAGMENT),
                &ExecOpts::sudo(),
            )
            .await?;
        if !success {
            return Err(ProvisionError::CommandFailed(format!(
                "failed to add repository {}",
                repo.url
            )));
        }

        let Some(key_id) = &repo.key_id else {
            return Ok(());
        };

        // Import the signing key.
        let success = transport
            .exec(
                &format!("gpg --keyserver {} --recv-keys {}", KEYSERVER, key_id),
                &ExecOpts::sudo(),
            )
            .await?;
        if !success {
            return Err(ProvisionError::CommandFailed(format!(
                "failed to import key {}",
                key_id
            )));
        }

        let success = transport
            .exec(
                &format!("sh -c 'gpg -a --export {} | apt-key add -'", key_id),
                &ExecOpts::sudo(),
            )
            .await?;
        if !success {
            return Err(ProvisionError::CommandFailed(format!(
                "failed to add repository key {}",
                key_id
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Provisioner for DebianProvisioner {
    async fn prepare(
        &self,
        transport: &dyn Transport,
        host: &BuildHost,
        environment: &Environment,
    ) -> Result<(), ProvisionError> {
        let result = self.provision(transport, host, environment).await;
        if let Err(e) = &result {
            tracing::error!(host = %host.hostname, error = %e, "failed to provision");
        }
        result
    }
}

#[cfg(test)]
#[path = "debian_tests.rs"]
mod tests;
