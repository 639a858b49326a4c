// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording notifier for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::Notifier;
use async_trait::async_trait;
use parking_lot::Mutex;
use rig_core::JobStatus;
use std::sync::Arc;

#[derive(Default)]
struct RecordingState {
    statuses: Vec<JobStatus>,
    log: Vec<u8>,
    ended_at_epoch_ms: Option<u64>,
}

/// Notifier that records everything written to it, for assertions.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    inner: Arc<Mutex<RecordingState>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every status transition, in order.
    pub fn statuses(&self) -> Vec<JobStatus> {
        self.inner.lock().statuses.clone()
    }

    pub fn last_status(&self) -> Option<JobStatus> {
        self.inner.lock().statuses.last().copied()
    }

    /// The accumulated log as a lossy string.
    pub fn log_string(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock().log).into_owned()
    }

    pub fn ended_at_epoch_ms(&self) -> Option<u64> {
        self.inner.lock().ended_at_epoch_ms
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn set_status(&self, status: JobStatus) {
        self.inner.lock().statuses.push(status);
    }

    async fn append_log(&self, bytes: &[u8]) {
        self.inner.lock().log.extend_from_slice(bytes);
    }

    async fn set_ended(&self, epoch_ms: u64) {
        self.inner.lock().ended_at_epoch_ms = Some(epoch_ms);
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
