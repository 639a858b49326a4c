// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notifier that routes to the process log.

use super::Notifier;
use async_trait::async_trait;
use rig_core::{JobId, JobStatus};

/// Routes status transitions and log output to the tracing subscriber.
///
/// Useful for local runs and as a stand-in where no external observer is
/// wired up.
pub struct TracingNotifier {
    job_id: JobId,
}

impl TracingNotifier {
    pub fn new(job_id: JobId) -> Self {
        Self { job_id }
    }
}

#[async_trait]
impl Notifier for TracingNotifier {
    async fn set_status(&self, status: JobStatus) {
        tracing::info!(job_id = %self.job_id, status = %status, "job status");
    }

    async fn append_log(&self, bytes: &[u8]) {
        let text = String::from_utf8_lossy(bytes);
        for line in text.lines() {
            tracing::info!(job_id = %self.job_id, "{}", line);
        }
    }

    async fn set_ended(&self, epoch_ms: u64) {
        tracing::debug!(job_id = %self.job_id, ended_at_epoch_ms = epoch_ms, "job ended");
    }
}
