// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run a shell command on the build host.

use super::{Action, ActionContext, ActionError, ActionFactory, ActionResult};
use crate::notifier::Notifier;
use crate::registry::{Registry, RegistryError};
use crate::transport::{ExecOpts, Transport};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::value::RawValue;
use std::sync::Arc;

/// Name this action is registered under.
pub const PLUGIN_NAME: &str = "command";

/// Register the command action.
pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_action(PLUGIN_NAME, Arc::new(CommandActionFactory))
}

struct CommandActionFactory;

impl ActionFactory for CommandActionFactory {
    fn create(&self, payload: &RawValue) -> Result<Box<dyn Action>, ActionError> {
        let action: CommandAction = serde_json::from_str(payload.get())
            .map_err(|e| ActionError::Malformed(e.to_string()))?;
        Ok(Box::new(action))
    }
}

/// Shell-command action: `{"action": "command", "cmd": "...", ...}`.
#[derive(Debug, Deserialize)]
pub struct CommandAction {
    pub cmd: String,
    /// Working directory on the build host.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub sudo: bool,
    #[serde(skip)]
    transport: Option<Arc<dyn Transport>>,
}

#[async_trait]
impl Action for CommandAction {
    async fn prepare(
        &mut self,
        transport: Arc<dyn Transport>,
        _ctx: &mut ActionContext,
    ) -> Result<(), ActionError> {
        self.transport = Some(transport);
        Ok(())
    }

    async fn perform(&mut self, notifier: &dyn Notifier) -> Result<ActionResult, ActionError> {
        let transport = self.transport.as_ref().ok_or(ActionError::NotPrepared)?;

        // Echo the command line so the job log reads like a terminal.
        notifier.append_log(format!("$ {}\n", self.cmd).as_bytes()).await;

        let opts = ExecOpts {
            sudo: self.sudo,
            path: self.path.clone(),
        };
        let success = transport.exec(&self.cmd, &opts).await?;
        Ok(ActionResult {
            success,
            exit_code: transport.exit_code().unwrap_or(-1),
        })
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
