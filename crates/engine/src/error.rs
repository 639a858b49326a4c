// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fatal job errors.
//!
//! Only failures that abort a job travel here. An expected step outcome,
//! a non-zero exit from a command the operator wrote, moves through the
//! stage graph as a value and may be handled by an `on_failure` branch.

use rig_core::MalformedPayload;
use rig_plugins::{ActionError, BuilderError, ProvisionError, TransportError};
use thiserror::Error;

/// Errors that abort a job. Every variant ends the job in `FAILED` after
/// resources are released.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Malformed payload, unknown stage or action, or an exceeded
    /// transition bound. Never retried.
    #[error("invalid job configuration: {0}")]
    Configuration(String),
    /// No builder, no host, or no compatible transport.
    #[error("failed to acquire build resources: {0}")]
    ResourceAcquisition(String),
    #[error("provisioning failed: {0}")]
    Provision(#[from] ProvisionError),
    /// Connection-level transport failure, as opposed to a command's own
    /// non-zero exit.
    #[error("remote execution failed: {0}")]
    Remote(#[from] TransportError),
    #[error("job was cancelled")]
    Cancelled,
}

impl From<MalformedPayload> for RunnerError {
    fn from(e: MalformedPayload) -> Self {
        RunnerError::Configuration(e.to_string())
    }
}

impl From<BuilderError> for RunnerError {
    fn from(e: BuilderError) -> Self {
        match e {
            BuilderError::NoHost(m) => RunnerError::ResourceAcquisition(m),
            e @ BuilderError::NoProvisioner(_) => RunnerError::Configuration(e.to_string()),
            BuilderError::Provision(e) => RunnerError::Provision(e),
        }
    }
}

impl From<ActionError> for RunnerError {
    fn from(e: ActionError) -> Self {
        match e {
            ActionError::Malformed(m) => {
                RunnerError::Configuration(format!("malformed action payload: {}", m))
            }
            ActionError::NotPrepared => {
                RunnerError::Configuration("action performed before prepare".to_string())
            }
            ActionError::Transport(e) => RunnerError::Remote(e),
        }
    }
}
