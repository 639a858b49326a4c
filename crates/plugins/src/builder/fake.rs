// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake builder for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{BuildHost, Builder, BuilderArgs, BuilderError, BuilderFactory};
use crate::registry::{Registry, RegistryError};
use crate::transport::Transport;
use async_trait::async_trait;
use parking_lot::Mutex;
use rig_core::Environment;
use std::sync::Arc;

/// Name the fake builder is registered under.
pub const PLUGIN_NAME: &str = "fake";

#[derive(Default)]
struct FakeBuilderState {
    host: Option<BuildHost>,
    get_error: Option<String>,
    prepare_error: Option<String>,
    created_for_os: Vec<String>,
    prepared: Vec<Environment>,
    released: Vec<String>,
}

/// Scripted builder that records acquisitions and releases.
///
/// Clones (and builders produced by [`FakeBuilderFactory`]) share state.
#[derive(Clone, Default)]
pub struct FakeBuilder {
    inner: Arc<Mutex<FakeBuilderState>>,
}

impl FakeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve this host instead of the default fake host.
    pub fn set_host(&self, host: BuildHost) {
        self.inner.lock().host = Some(host);
    }

    /// Make `get()` fail.
    pub fn set_get_error(&self, message: &str) {
        self.inner.lock().get_error = Some(message.to_string());
    }

    /// Make `prepare()` fail.
    pub fn set_prepare_error(&self, message: &str) {
        self.inner.lock().prepare_error = Some(message.to_string());
    }

    /// OS values builders were created for, in order.
    pub fn created_for_os(&self) -> Vec<String> {
        self.inner.lock().created_for_os.clone()
    }

    /// Environments passed to `prepare()`, in order.
    pub fn prepared(&self) -> Vec<Environment> {
        self.inner.lock().prepared.clone()
    }

    /// Hostnames released, in order.
    pub fn released(&self) -> Vec<String> {
        self.inner.lock().released.clone()
    }
}

#[async_trait]
impl Builder for FakeBuilder {
    async fn get(&self) -> Result<BuildHost, BuilderError> {
        let state = self.inner.lock();
        if let Some(message) = &state.get_error {
            return Err(BuilderError::NoHost(message.clone()));
        }
        Ok(state.host.clone().unwrap_or_else(BuildHost::fake))
    }

    async fn prepare(
        &self,
        _transport: &dyn Transport,
        _host: &BuildHost,
        environment: &Environment,
    ) -> Result<(), BuilderError> {
        let mut state = self.inner.lock();
        if let Some(message) = &state.prepare_error {
            return Err(BuilderError::NoProvisioner(message.clone()));
        }
        state.prepared.push(environment.clone());
        Ok(())
    }

    async fn release(&self, _transport: Option<&dyn Transport>, host: &BuildHost) {
        self.inner.lock().released.push(host.hostname.clone());
    }
}

/// Factory yielding builders that share one [`FakeBuilder`]'s state.
#[derive(Clone, Default)]
pub struct FakeBuilderFactory {
    builder: FakeBuilder,
}

impl FakeBuilderFactory {
    pub fn new(builder: FakeBuilder) -> Self {
        Self { builder }
    }

    /// Register this factory under the fake builder name.
    pub fn register(self, registry: &mut Registry) -> Result<(), RegistryError> {
        registry.register_builder(PLUGIN_NAME, Arc::new(self))
    }
}

impl BuilderFactory for FakeBuilderFactory {
    fn create(&self, args: BuilderArgs) -> Result<Box<dyn Builder>, BuilderError> {
        self.builder.inner.lock().created_for_os.push(args.os);
        Ok(Box::new(self.builder.clone()))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
