// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote command and file-transfer channel to a build host.

pub mod container;

pub use container::ContainerTransport;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTransport, FakeTransportFactory, RecordedCommand};

use crate::builder::BuildHost;
use crate::config::PluginsConfig;
use crate::notifier::Notifier;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};

/// Errors from transport operations.
///
/// A non-zero remote exit is never an error here; that travels through
/// the `bool` returned by [`Transport::exec`] plus the retained exit code.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The host or its session could not be reached.
    #[error("connection failed: {0}")]
    Connection(String),
    /// A remote command exceeded its execution bound.
    #[error("remote command timed out after {0}s")]
    Timeout(u64),
    /// An upload or download did not complete.
    #[error("transfer failed: {0}")]
    Transfer(String),
}

/// Options for a single remote command.
#[derive(Debug, Clone, Default)]
pub struct ExecOpts {
    /// Elevate with sudo. Ignored when the authenticated user is root.
    pub sudo: bool,
    /// Working directory for the command.
    pub path: Option<String>,
}

impl ExecOpts {
    pub fn sudo() -> Self {
        Self {
            sudo: true,
            path: None,
        }
    }
}

/// A live command/file-transfer channel, bound to exactly one build host
/// connection for one job. Never shared across jobs; closed exactly once.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Run a remote command. Returns `Ok(true)` iff it exited 0; the
    /// concrete exit code is retained and queryable via [`exit_code`].
    ///
    /// [`exit_code`]: Transport::exit_code
    async fn exec(&self, cmd: &str, opts: &ExecOpts) -> Result<bool, TransportError>;

    /// Exit code of the most recent `exec`, if one has completed.
    fn exit_code(&self) -> Option<i32>;

    /// Export environment variables, prepended to every subsequent `exec`
    /// as shell export statements.
    fn export_env(&self, vars: &[(String, String)]);

    /// Byte-exact copy from a local reader to a remote absolute path.
    async fn upload(
        &self,
        source: &mut (dyn AsyncRead + Send + Unpin),
        path: &str,
    ) -> Result<(), TransportError>;

    /// Byte-exact copy from a remote absolute path to a local writer.
    async fn download(
        &self,
        path: &str,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<(), TransportError>;

    /// Release the underlying session. Best-effort and idempotent.
    async fn close(&self);
}

impl std::fmt::Debug for dyn Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Transport")
    }
}

/// What a transport factory needs to connect to a build host.
pub struct TransportArgs<'a> {
    pub host: &'a BuildHost,
    /// Sink for remote output; every chunk is forwarded as it arrives.
    pub log: Arc<dyn Notifier>,
    pub config: &'a PluginsConfig,
}

/// Creates a connected transport for one build host.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn create(&self, args: TransportArgs<'_>) -> Result<Arc<dyn Transport>, TransportError>;
}

/// Compose the effective remote command line.
///
/// Prepends exported environment variables as shell exports, changes into
/// the working directory if given, and wraps the command for
/// non-interactive privilege elevation when `sudo` is requested by a
/// non-root user. Root ignores `sudo`. Components are joined with `;` for
/// execution under a login shell.
pub(crate) fn compose_command(
    cmd: &str,
    opts: &ExecOpts,
    env: &[(String, String)],
    username: &str,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !env.is_empty() {
        let exports: Vec<String> = env
            .iter()
            .map(|(key, value)| {
                let key: String = key
                    .chars()
                    .map(|c| if c.is_whitespace() { '_' } else { c })
                    .collect::<String>()
                    .to_uppercase();
                format!("export {}=\"{}\"", key, value)
            })
            .collect();
        parts.push(exports.join(";"));
    }

    if let Some(path) = &opts.path {
        parts.push(format!("cd {}", path));
    }

    if username != "root" && opts.sudo {
        parts.push(format!("sudo -E -n $SHELL -l -c '{}'", cmd));
    } else {
        parts.push(cmd.to_string());
    }

    parts.join(";")
}
