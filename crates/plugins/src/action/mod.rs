// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executable units of work within a stage.
//!
//! Action payloads are tagged JSON: the `action` discriminator names the
//! registered plugin, the remaining fields belong to it. Deserialization
//! is a pure function producing the action value; no code runs until the
//! runner calls `prepare`/`perform`.

pub mod command;

pub use command::CommandAction;

use crate::notifier::Notifier;
use crate::transport::{Transport, TransportError};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::value::RawValue;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Mutable state shared by the steps of one stage.
pub type ActionContext = HashMap<String, serde_json::Value>;

/// Errors from action deserialization and execution.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("malformed action payload: {0}")]
    Malformed(String),
    /// `perform` was called without a prior `prepare`.
    #[error("action was not prepared")]
    NotPrepared,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Outcome of one performed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionResult {
    pub success: bool,
    pub exit_code: i32,
}

/// A single unit of work executed against a connected transport.
///
/// Lifecycle: constructed by deserialization, prepared once, performed
/// exactly once, then discarded.
#[async_trait]
pub trait Action: Send {
    /// Bind the job's transport and the stage-scoped context map.
    async fn prepare(
        &mut self,
        transport: Arc<dyn Transport>,
        ctx: &mut ActionContext,
    ) -> Result<(), ActionError>;

    /// Do the work, reporting output through the notifier.
    async fn perform(&mut self, notifier: &dyn Notifier) -> Result<ActionResult, ActionError>;
}

impl std::fmt::Debug for dyn Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Action")
    }
}

/// Deserializes an action payload into an executable action.
pub trait ActionFactory: Send + Sync {
    fn create(&self, payload: &RawValue) -> Result<Box<dyn Action>, ActionError>;
}

/// Read the discriminator field from an action payload.
pub fn action_name(payload: &RawValue) -> Result<String, ActionError> {
    #[derive(Deserialize)]
    struct Tag {
        action: String,
    }
    let tag: Tag = serde_json::from_str(payload.get())
        .map_err(|e| ActionError::Malformed(format!("missing action discriminator: {}", e)))?;
    Ok(tag.action)
}
