// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rig-engine: the job runner. Acquires a build host, connects a
//! transport, provisions the host, and drives the job's stage graph to a
//! terminal status.

pub mod config;
pub mod context;
pub mod error;
pub mod runner;

pub use config::EngineConfig;
pub use context::EngineContext;
pub use error::RunnerError;
pub use runner::Runner;
