// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for submitting jobs to the engine with fake
//! plugins standing in for the container runtime.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use async_trait::async_trait;
use rig_core::{CancellationToken, Environment, FakeClock, JobId, JobStatus};
use rig_engine::{EngineConfig, EngineContext, Runner, RunnerError};
use rig_plugins::builder::{BuildHost, Builder, BuilderArgs, BuilderError, BuilderFactory};
use rig_plugins::provisioner::provisioner_for_os;
use rig_plugins::registry::Registry;
use rig_plugins::transport::Transport;
use rig_plugins::{FakeTransport, FakeTransportFactory, RecordingNotifier};
use std::sync::Arc;

/// A world the engine runs jobs in: fake host, fake transport, real
/// registry, real runner.
pub struct JobWorld {
    pub transport: FakeTransport,
    pub notifier: RecordingNotifier,
    pub clock: FakeClock,
    pub cancel: CancellationToken,
    context: EngineContext,
}

impl JobWorld {
    /// World whose builder hands out a fake host and provisions it
    /// through the real provisioner chain.
    pub fn new() -> Self {
        let transport = FakeTransport::new();
        let mut registry = Registry::new();
        FakeTransportFactory::new(transport.clone())
            .register(&mut registry)
            .unwrap();
        rig_plugins::provisioner::debian::register(&mut registry).unwrap();
        rig_plugins::action::command::register(&mut registry).unwrap();
        registry
            .register_builder("fake", Arc::new(ProvisioningBuilderFactory))
            .unwrap();

        let config = EngineConfig {
            builder: "fake".to_string(),
            ..EngineConfig::default()
        };

        Self {
            transport,
            notifier: RecordingNotifier::new(),
            clock: FakeClock::default(),
            cancel: CancellationToken::new(),
            context: EngineContext::with_registry(config, registry),
        }
    }

    /// Construct a runner for the payload and run it to completion.
    pub async fn submit(&self, payload: &str) -> Result<JobStatus, RunnerError> {
        let runner = Runner::with_clock(
            JobId::random(),
            payload,
            Arc::new(self.notifier.clone()),
            &self.context,
            self.cancel.clone(),
            self.clock.clone(),
        )
        .await?;
        runner.run().await
    }

    pub fn statuses(&self) -> Vec<JobStatus> {
        self.notifier.statuses()
    }
}

/// Builder over a static fake host that still runs the real provisioner
/// resolution, so provisioning commands reach the fake transport.
struct ProvisioningBuilder {
    registry: Arc<Registry>,
}

#[async_trait]
impl Builder for ProvisioningBuilder {
    async fn get(&self) -> Result<BuildHost, BuilderError> {
        Ok(BuildHost::fake())
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

    async fn release(&self, _transport: Option<&dyn Transport>, _host: &BuildHost) {}
}

struct ProvisioningBuilderFactory;

impl BuilderFactory for ProvisioningBuilderFactory {
    fn create(&self, args: BuilderArgs) -> Result<Box<dyn Builder>, BuilderError> {
        Ok(Box::new(ProvisioningBuilder {
            registry: args.registry,
        }))
    }
}

/// A step running a shell command on the build host.
pub fn cmd(command: &str) -> serde_json::Value {
    serde_json::json!({"action": {"action": "command", "cmd": command}})
}

/// A job payload over a plain Debian environment.
pub fn job(stages: serde_json::Value, sequence: &[&str]) -> String {
    serde_json::json!({
        "environment": {"os": "debian"},
        "stages": stages,
        "sequence": sequence,
    })
    .to_string()
}
