// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build host environment requirements.

use serde::{Deserialize, Serialize};

/// What the job needs from its build host: an OS, and optionally extra
/// package repositories and packages installed before any stage runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// OS/distribution name the builder must satisfy (e.g. "debian").
    pub os: String,
    /// Additional package repositories to configure during provisioning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repos: Option<Vec<RepoSpec>>,
    /// Packages to install during provisioning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packages: Option<Vec<String>>,
}

/// A single package repository definition.
///
/// `components` is required for http/https repositories; the provisioner
/// rejects entries without it before issuing any remote command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSpec {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<String>,
    /// Signing key to fetch from a public keyserver and trust.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
