// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration.

use rig_plugins::PluginsConfig;
use serde::Deserialize;

/// Default cap on stage transitions per job.
const DEFAULT_MAX_STAGE_TRANSITIONS: u32 = 100;

/// Process-wide engine settings, resolved once at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Builder plugin acquiring build hosts. One active builder per
    /// deployment.
    pub builder: String,
    /// Upper bound on stage transitions per job. Stage graphs are
    /// operator-authored and may contain cycles; a job exceeding this
    /// bound fails instead of looping forever.
    pub max_stage_transitions: u32,
    pub plugins: PluginsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            builder: "container".to_string(),
            max_stage_transitions: DEFAULT_MAX_STAGE_TRANSITIONS,
            plugins: PluginsConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
