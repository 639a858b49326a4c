// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job definition: environment, stage graph, and entry sequence.
//!
//! A job arrives as one serialized payload. The outer definition is
//! deserialized once at runner construction; stage bodies and step action
//! bodies stay as raw JSON until the moment they execute. This bounds
//! memory and tolerates heterogeneous action schemas within one job.

use crate::environment::Environment;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use thiserror::Error;

/// Error raised when a job, stage, or step payload is malformed.
#[derive(Debug, Error)]
#[error("malformed {what}: {source}")]
pub struct MalformedPayload {
    what: &'static str,
    #[source]
    source: serde_json::Error,
}

/// The deserialized outer job payload.
///
/// Owned exclusively by one runner for its lifetime; immutable after
/// construction. The cursor tracking the current stage lives in the
/// runner, not here.
#[derive(Debug, Deserialize, Serialize)]
pub struct JobDefinition {
    pub environment: Environment,
    /// Stage bodies keyed by stage id, kept serialized until executed.
    pub stages: IndexMap<String, Box<RawValue>>,
    /// Entry sequence; the first element is the start stage.
    pub sequence: Vec<String>,
}

impl JobDefinition {
    /// Deserialize the outer job payload.
    pub fn parse(payload: &str) -> Result<Self, MalformedPayload> {
        serde_json::from_str(payload).map_err(|source| MalformedPayload {
            what: "job definition",
            source,
        })
    }

    /// Id of the stage the runner starts at, if the sequence is non-empty.
    pub fn entry_stage(&self) -> Option<&str> {
        self.sequence.first().map(String::as_str)
    }
}

/// A node in the job's execution graph.
///
/// A stage with both branches absent is terminal. The graph is
/// operator-defined and may contain cycles; the runner bounds total
/// transitions rather than rejecting cyclic graphs up front.
#[derive(Debug, Deserialize, Serialize)]
pub struct Stage {
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_success: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_failure: Option<String>,
}

impl Stage {
    /// Deserialize a stage body from its raw form in the job definition.
    pub fn parse(raw: &RawValue) -> Result<Self, MalformedPayload> {
        serde_json::from_str(raw.get()).map_err(|source| MalformedPayload {
            what: "stage",
            source,
        })
    }
}

/// A single step: a serialized action payload, deserialized immediately
/// before execution.
#[derive(Debug, Deserialize, Serialize)]
pub struct Step {
    pub action: Box<RawValue>,
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
