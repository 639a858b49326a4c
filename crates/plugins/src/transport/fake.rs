// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake transport for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ExecOpts, Transport, TransportArgs, TransportError, TransportFactory};
use crate::registry::{Registry, RegistryError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Name the fake transport is registered under.
pub const PLUGIN_NAME: &str = "fake";

/// A command observed by the fake transport.
#[derive(Debug, Clone)]
pub struct RecordedCommand {
    pub cmd: String,
    pub sudo: bool,
    pub path: Option<String>,
}

#[derive(Default)]
struct FakeTransportState {
    commands: Vec<RecordedCommand>,
    exports: Vec<(String, String)>,
    /// Substring rules: a command containing the key exits with the code.
    failures: Vec<(String, i32)>,
    exit_code: Option<i32>,
    uploads: Vec<(String, Vec<u8>)>,
    downloads: HashMap<String, Vec<u8>>,
    close_count: u32,
    connect_error: Option<String>,
}

/// Scripted transport that records every call.
///
/// Clones (and transports produced by [`FakeTransportFactory`]) share
/// state, so a test can keep one handle and observe commands issued
/// through an instance created deep inside the engine.
#[derive(Clone, Default)]
pub struct FakeTransport {
    inner: Arc<Mutex<FakeTransportState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands containing `needle` will exit with `code`.
    pub fn fail_matching(&self, needle: &str, code: i32) {
        self.inner
            .lock()
            .failures
            .push((needle.to_string(), code));
    }

    /// Serve `bytes` for downloads of `path`.
    pub fn set_remote_file(&self, path: &str, bytes: &[u8]) {
        self.inner
            .lock()
            .downloads
            .insert(path.to_string(), bytes.to_vec());
    }

    /// Make factory connection attempts fail.
    pub fn set_connect_error(&self, message: &str) {
        self.inner.lock().connect_error = Some(message.to_string());
    }

    /// Every executed command line, in order.
    pub fn commands(&self) -> Vec<String> {
        self.inner
            .lock()
            .commands
            .iter()
            .map(|c| c.cmd.clone())
            .collect()
    }

    /// Every executed command with its options, in order.
    pub fn recorded(&self) -> Vec<RecordedCommand> {
        self.inner.lock().commands.clone()
    }

    /// Exported environment variables, in export order.
    pub fn exports(&self) -> Vec<(String, String)> {
        self.inner.lock().exports.clone()
    }

    /// Bytes uploaded per remote path, in upload order.
    pub fn uploads(&self) -> Vec<(String, Vec<u8>)> {
        self.inner.lock().uploads.clone()
    }

    pub fn close_count(&self) -> u32 {
        self.inner.lock().close_count
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn exec(&self, cmd: &str, opts: &ExecOpts) -> Result<bool, TransportError> {
        let mut state = self.inner.lock();
        state.commands.push(RecordedCommand {
            cmd: cmd.to_string(),
            sudo: opts.sudo,
            path: opts.path.clone(),
        });
        let code = state
            .failures
            .iter()
            .find(|(needle, _)| cmd.contains(needle))
            .map(|(_, code)| *code)
            .unwrap_or(0);
        state.exit_code = Some(code);
        Ok(code == 0)
    }

    fn exit_code(&self) -> Option<i32> {
        self.inner.lock().exit_code
    }

    fn export_env(&self, vars: &[(String, String)]) {
        self.inner.lock().exports.extend_from_slice(vars);
    }

    async fn upload(
        &self,
        source: &mut (dyn AsyncRead + Send + Unpin),
        path: &str,
    ) -> Result<(), TransportError> {
        let mut bytes = Vec::new();
        source
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| TransportError::Transfer(e.to_string()))?;
        self.inner.lock().uploads.push((path.to_string(), bytes));
        Ok(())
    }

    async fn download(
        &self,
        path: &str,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<(), TransportError> {
        let bytes = self
            .inner
            .lock()
            .downloads
            .get(path)
            .cloned()
            .ok_or_else(|| TransportError::Transfer(format!("no remote file at {}", path)))?;
        sink.write_all(&bytes)
            .await
            .map_err(|e| TransportError::Transfer(e.to_string()))?;
        Ok(())
    }

    async fn close(&self) {
        self.inner.lock().close_count += 1;
    }
}

/// Factory yielding transports that share one [`FakeTransport`]'s state.
#[derive(Clone, Default)]
pub struct FakeTransportFactory {
    transport: FakeTransport,
}

impl FakeTransportFactory {
    pub fn new(transport: FakeTransport) -> Self {
        Self { transport }
    }

    /// Register this factory under the fake transport name.
    pub fn register(self, registry: &mut Registry) -> Result<(), RegistryError> {
        registry.register_transport(PLUGIN_NAME, Arc::new(self))
    }
}

#[async_trait]
impl TransportFactory for FakeTransportFactory {
    async fn create(&self, _args: TransportArgs<'_>) -> Result<Arc<dyn Transport>, TransportError> {
        if let Some(message) = self.transport.inner.lock().connect_error.clone() {
            return Err(TransportError::Connection(message));
        }
        Ok(Arc::new(self.transport.clone()))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
