// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build host acquisition and release.

pub mod container;

pub use container::ContainerBuilder;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeBuilder, FakeBuilderFactory};

use crate::config::PluginsConfig;
use crate::provisioner::ProvisionError;
use crate::registry::Registry;
use crate::transport::Transport;
use async_trait::async_trait;
use rig_core::Environment;
use std::sync::Arc;
use thiserror::Error;

/// Errors from builder operations.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// No host could be obtained (capacity, provider error, missing image).
    #[error("no build host available: {0}")]
    NoHost(String),
    /// The host's OS family has no registered provisioner.
    #[error("no provisioner for os: {0}")]
    NoProvisioner(String),
    #[error("provisioning failed: {0}")]
    Provision(#[from] ProvisionError),
}

/// A machine/container instance on which job commands execute.
///
/// Created by a builder's `get()`, exclusively owned by the runner that
/// acquired it for the job's duration, reclaimed by the same builder's
/// `release()`.
#[derive(Debug, Clone)]
pub struct BuildHost {
    pub hostname: String,
    pub os: String,
    /// Distribution release name (e.g. "bookworm"), used by provisioners.
    pub release: String,
    /// Transport names the host supports, most preferred first.
    pub transports: Vec<String>,
    /// Connection address: an IP/DNS name, or a container identifier.
    pub address: String,
    pub username: String,
    pub credential: Option<String>,
}

impl BuildHost {
    /// Connection parameters as a tuple for transports that want them.
    pub fn connect_info(&self) -> (&str, &str, Option<&str>) {
        (&self.address, &self.username, self.credential.as_deref())
    }
}

#[cfg(any(test, feature = "test-support"))]
impl BuildHost {
    /// A plausible host wired to the fake transport, for tests.
    pub fn fake() -> Self {
        Self {
            hostname: "fake-host".to_string(),
            os: "debian".to_string(),
            release: "bookworm".to_string(),
            transports: vec!["fake".to_string()],
            address: "fake-host.test".to_string(),
            username: "build".to_string(),
            credential: None,
        }
    }
}

/// Supplies and reclaims build hosts of one kind.
#[async_trait]
pub trait Builder: Send + Sync {
    /// Acquire a build host matching the OS this builder was created for.
    async fn get(&self) -> Result<BuildHost, BuilderError>;

    /// Prepare the host's package environment before any stage runs.
    /// Delegates to a provisioner chosen by the host's OS family.
    async fn prepare(
        &self,
        transport: &dyn Transport,
        host: &BuildHost,
        environment: &Environment,
    ) -> Result<(), BuilderError>;

    /// Tear the host down. Best-effort: never fails the job, and safe to
    /// call even if acquisition only partially completed.
    async fn release(&self, transport: Option<&dyn Transport>, host: &BuildHost);
}

/// What a builder factory needs to construct a builder for one job.
pub struct BuilderArgs {
    /// OS requirement from the job's environment.
    pub os: String,
    pub config: PluginsConfig,
    /// For resolving the provisioner at prepare time.
    pub registry: Arc<Registry>,
}

/// Creates a builder bound to one job's OS requirement.
pub trait BuilderFactory: Send + Sync {
    fn create(&self, args: BuilderArgs) -> Result<Box<dyn Builder>, BuilderError>;
}
