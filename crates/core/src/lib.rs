// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rig-core: Core data model for the rig job execution engine

pub mod cancel;
pub mod clock;
pub mod environment;
pub mod id;
pub mod job;
pub mod status;

pub use cancel::CancellationToken;
pub use clock::{Clock, FakeClock, SystemClock};
pub use environment::{Environment, RepoSpec};
pub use id::JobId;
pub use job::{JobDefinition, MalformedPayload, Stage, Step};
pub use status::JobStatus;
