// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container-exec transport.
//!
//! Runs commands inside an existing container through the container
//! runtime CLI's exec API. Output is forwarded to the job's log sink
//! chunk by chunk as it arrives; every command is bounded by
//! [`EXEC_TIMEOUT`] so a hung remote process fails the call instead of
//! wedging the job worker.

use super::{compose_command, ExecOpts, Transport, TransportArgs, TransportError};
use crate::notifier::Notifier;
use crate::registry::{Registry, RegistryError};
use crate::subprocess::{run_with_timeout, EXEC_TIMEOUT, RUNTIME_CLI_TIMEOUT};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::process::Command;

/// Name this transport is registered under.
pub const PLUGIN_NAME: &str = "container";

/// Register the container transport.
pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_transport(PLUGIN_NAME, Arc::new(ContainerTransportFactory))
}

struct ContainerTransportFactory;

#[async_trait]
impl super::TransportFactory for ContainerTransportFactory {
    async fn create(&self, args: TransportArgs<'_>) -> Result<Arc<dyn Transport>, TransportError> {
        Ok(Arc::new(ContainerTransport::connect(args).await?))
    }
}

/// Transport bound to one container for one job.
pub struct ContainerTransport {
    binary: String,
    endpoint: Option<String>,
    container: String,
    username: String,
    log: Arc<dyn Notifier>,
    env: Mutex<Vec<(String, String)>>,
    exit_code: Mutex<Option<i32>>,
    exec_timeout: Duration,
}

impl std::fmt::Debug for ContainerTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerTransport")
            .field("binary", &self.binary)
            .field("endpoint", &self.endpoint)
            .field("container", &self.container)
            .field("username", &self.username)
            .field("exec_timeout", &self.exec_timeout)
            .finish_non_exhaustive()
    }
}

impl ContainerTransport {
    /// Verify the container is reachable and bind a transport to it.
    ///
    /// The build host's address is the container identifier; connecting to
    /// a host without one, or to a container the runtime does not know,
    /// fails here rather than at first exec.
    pub async fn connect(args: TransportArgs<'_>) -> Result<Self, TransportError> {
        let container = args.host.address.clone();
        if container.is_empty() {
            return Err(TransportError::Connection(
                "build host has no container identifier".to_string(),
            ));
        }

        let transport = Self {
            binary: args.config.container.binary.clone(),
            endpoint: args.config.container.endpoint.clone(),
            container,
            username: args.host.username.clone(),
            log: args.log,
            env: Mutex::new(Vec::new()),
            exit_code: Mutex::new(None),
            exec_timeout: EXEC_TIMEOUT,
        };

        let inspect = transport.runtime_command(&["container", "inspect", &transport.container]);
        let output = run_with_timeout(inspect, RUNTIME_CLI_TIMEOUT, "container inspect")
            .await
            .map_err(TransportError::Connection)?;
        if !output.status.success() {
            return Err(TransportError::Connection(format!(
                "container {} not found: {}",
                transport.container,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(transport)
    }

    fn runtime_command(&self, tail: &[&str]) -> Command {
        let mut cmd = Command::new(&self.binary);
        if let Some(endpoint) = &self.endpoint {
            cmd.args(["-H", endpoint]);
        }
        cmd.args(tail);
        cmd
    }
}

/// Forward a child output stream to the log sink as chunks arrive.
async fn forward_output<R>(stream: Option<R>, log: Arc<dyn Notifier>)
where
    R: AsyncRead + Unpin,
{
    let Some(mut stream) = stream else { return };
    let mut buf = [0u8; 4096];
    loop {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => log.append_log(&buf[..n]).await,
        }
    }
}

#[async_trait]
impl Transport for ContainerTransport {
    async fn exec(&self, cmd: &str, opts: &ExecOpts) -> Result<bool, TransportError> {
        let env = self.env.lock().clone();
        let composed = compose_command(cmd, opts, &env, &self.username);
        tracing::debug!(container = %self.container, command = %composed, "exec");

        let mut command =
            self.runtime_command(&["exec", &self.container, "sh", "-l", "-c", &composed]);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().map_err(|e| {
            TransportError::Connection(format!("could not spawn {}: {}", self.binary, e))
        })?;

        let out = tokio::spawn(forward_output(child.stdout.take(), self.log.clone()));
        let err = tokio::spawn(forward_output(child.stderr.take(), self.log.clone()));

        let status = match tokio::time::timeout(self.exec_timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                out.abort();
                err.abort();
                return Err(TransportError::Connection(format!(
                    "exec wait failed: {}",
                    e
                )));
            }
            Err(_elapsed) => {
                let _ = child.kill().await;
                out.abort();
                err.abort();
                return Err(TransportError::Timeout(self.exec_timeout.as_secs()));
            }
        };

        // Drain the forwarders so trailing output reaches the log.
        let _ = out.await;
        let _ = err.await;

        let code = status.code().unwrap_or(-1);
        *self.exit_code.lock() = Some(code);
        Ok(code == 0)
    }

    fn exit_code(&self) -> Option<i32> {
        *self.exit_code.lock()
    }

    fn export_env(&self, vars: &[(String, String)]) {
        self.env.lock().extend_from_slice(vars);
    }

    async fn upload(
        &self,
        source: &mut (dyn AsyncRead + Send + Unpin),
        path: &str,
    ) -> Result<(), TransportError> {
        let write_cmd = format!("cat > {}", path);
        let mut command =
            self.runtime_command(&["exec", "-i", &self.container, "sh", "-c", &write_cmd]);
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = command.spawn().map_err(|e| {
            TransportError::Connection(format!("could not spawn {}: {}", self.binary, e))
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            tokio::io::copy(source, &mut stdin)
                .await
                .map_err(|e| TransportError::Transfer(format!("upload to {}: {}", path, e)))?;
            // Close stdin so the remote cat sees EOF.
            drop(stdin);
        }

        let output = tokio::time::timeout(self.exec_timeout, child.wait_with_output())
            .await
            .map_err(|_| TransportError::Timeout(self.exec_timeout.as_secs()))?
            .map_err(|e| TransportError::Transfer(format!("upload to {}: {}", path, e)))?;
        if !output.status.success() {
            return Err(TransportError::Transfer(format!(
                "upload to {} failed: {}",
                path,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }

    async fn download(
        &self,
        path: &str,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<(), TransportError> {
        let command = self.runtime_command(&["exec", self.container.as_str(), "cat", path]);
        let output = run_with_timeout(command, self.exec_timeout, "container exec cat")
            .await
            .map_err(TransportError::Transfer)?;
        if !output.status.success() {
            return Err(TransportError::Transfer(format!(
                "download of {} failed: {}",
                path,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        tokio::io::AsyncWriteExt::write_all(sink, &output.stdout)
            .await
            .map_err(|e| TransportError::Transfer(format!("download of {}: {}", path, e)))?;
        Ok(())
    }

    async fn close(&self) {
        // The exec API holds no persistent session; nothing to tear down.
        tracing::debug!(container = %self.container, "transport closed");
    }
}

#[cfg(test)]
#[path = "container_tests.rs"]
mod tests;
