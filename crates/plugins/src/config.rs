// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide plugin configuration.
//!
//! Resolved once at startup and handed to plugin factories by reference;
//! plugins never reach for ambient global state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration shared by all plugins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    pub container: ContainerConfig,
    /// Build host image per OS name, used by the container builder.
    pub images: HashMap<String, ImageSpec>,
}

/// Container runtime settings for the container builder and transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Container runtime CLI binary.
    pub binary: String,
    /// Remote runtime API endpoint (passed as `-H`); local socket if unset.
    pub endpoint: Option<String>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            binary: "docker".to_string(),
            endpoint: None,
        }
    }
}

/// Image and release descriptor for one OS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSpec {
    /// Image reference to start build host containers from.
    pub image: String,
    /// Distribution release name, used in apt source lines (e.g. "bookworm").
    pub release: String,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
