// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job status state machine values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Externally visible job state.
///
/// The wire values are part of the observer contract and must not change:
/// `WAITING`, `STARTED`, `FAILING`, `FAILED`, `SUCCEEDED`.
///
/// Transitions: `WAITING → STARTED → (FAILING → FAILED | SUCCEEDED)`.
/// `FAILING` is transient, held while failure-branch stages run; a job
/// that entered it can only finalize to `FAILED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Resources are being acquired; no stage has run yet.
    Waiting,
    /// The first stage has begun executing.
    Started,
    /// A stage has failed; failure-branch stages may still run.
    Failing,
    /// Terminal: the job failed.
    Failed,
    /// Terminal: every stage on the taken path succeeded.
    Succeeded,
}

impl JobStatus {
    /// True for the two terminal states.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Failed | JobStatus::Succeeded)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Waiting => write!(f, "WAITING"),
            JobStatus::Started => write!(f, "STARTED"),
            JobStatus::Failing => write!(f, "FAILING"),
            JobStatus::Failed => write!(f, "FAILED"),
            JobStatus::Succeeded => write!(f, "SUCCEEDED"),
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
