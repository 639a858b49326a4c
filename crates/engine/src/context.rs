// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Explicitly-constructed engine context.
//!
//! Built once at process start and passed by reference into every
//! runner; there is no ambient global registry or configuration. The
//! registry is populated before the first job worker starts and is
//! immutable afterwards, so the job-time read path takes no lock.

use crate::config::EngineConfig;
use rig_plugins::registry::{register_builtins, Registry, RegistryError};
use std::sync::Arc;

/// Shared, read-only state handed to each runner.
pub struct EngineContext {
    pub registry: Arc<Registry>,
    pub config: EngineConfig,
}

impl EngineContext {
    /// Context with every built-in plugin registered.
    pub fn new(config: EngineConfig) -> Result<Self, RegistryError> {
        let mut registry = Registry::new();
        register_builtins(&mut registry)?;
        Ok(Self {
            registry: Arc::new(registry),
            config,
        })
    }

    /// Context over a caller-assembled registry.
    pub fn with_registry(config: EngineConfig, registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
            config,
        }
    }
}
