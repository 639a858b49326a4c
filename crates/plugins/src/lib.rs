// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! rig-plugins: interchangeable builders, transports, provisioners, and
//! actions, plus the registry that resolves them by name.

pub mod action;
pub mod builder;
pub mod config;
pub mod notifier;
pub mod provisioner;
pub mod registry;
pub mod subprocess;
pub mod transport;

pub use action::{
    action_name, Action, ActionContext, ActionError, ActionFactory, ActionResult, CommandAction,
};
pub use builder::{BuildHost, Builder, BuilderArgs, BuilderError, BuilderFactory, ContainerBuilder};
pub use config::{ContainerConfig, ImageSpec, PluginsConfig};
pub use notifier::{Notifier, TracingNotifier};
pub use provisioner::{provisioner_for_os, DebianProvisioner, ProvisionError, Provisioner};
pub use registry::{register_builtins, Category, Registry, RegistryError};
pub use transport::{ContainerTransport, ExecOpts, Transport, TransportArgs, TransportError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use builder::{FakeBuilder, FakeBuilderFactory};
#[cfg(any(test, feature = "test-support"))]
pub use notifier::RecordingNotifier;
#[cfg(any(test, feature = "test-support"))]
pub use transport::{FakeTransport, FakeTransportFactory, RecordedCommand};
