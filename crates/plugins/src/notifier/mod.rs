// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notifier boundary: status transitions and log bytes flow out here.
//!
//! The engine only ever writes to a notifier; persistence, visibility,
//! and any real-time push to observers live on the other side of this
//! boundary. All operations are fire-and-forget.

mod trace;

pub use trace::TracingNotifier;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::RecordingNotifier;

use async_trait::async_trait;
use rig_core::JobStatus;

/// Per-job sink for status transitions and log output.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Record a job status transition.
    async fn set_status(&self, status: JobStatus);

    /// Append raw log bytes (transport output arrives chunk by chunk).
    async fn append_log(&self, bytes: &[u8]);

    /// Record the job's end timestamp. Default implementation discards it.
    async fn set_ended(&self, _epoch_ms: u64) {}
}
