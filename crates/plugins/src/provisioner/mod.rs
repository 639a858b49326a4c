// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build host package-environment preparation.

pub mod debian;

pub use debian::DebianProvisioner;

use crate::builder::BuildHost;
use crate::transport::{Transport, TransportError};
use async_trait::async_trait;
use rig_core::Environment;
use thiserror::Error;

/// Errors from provisioning.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A repo entry is unusable as configured. Raised before any remote
    /// command is issued for that repo.
    #[error("repository {url} has no components list")]
    MissingComponents { url: String },
    /// A provisioning command exited non-zero.
    #[error("{0}")]
    CommandFailed(String),
    /// The transport itself failed (connection, timeout).
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Prepares a build host's package environment before actions run.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Configure repositories and install packages per the environment.
    /// Any irrecoverable step propagates; nothing is swallowed.
    async fn prepare(
        &self,
        transport: &dyn Transport,
        host: &BuildHost,
        environment: &Environment,
    ) -> Result<(), ProvisionError>;
}

/// Map an OS name to the provisioner plugin covering its family.
pub fn provisioner_for_os(os: &str) -> &str {
    match os {
        "debian" | "ubuntu" => debian::PLUGIN_NAME,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        debian = { "debian", "debian" },
        ubuntu = { "ubuntu", "debian" },
        other = { "alpine", "alpine" },
    )]
    fn os_family_mapping(os: &str, expected: &str) {
        assert_eq!(provisioner_for_os(os), expected);
    }
}
