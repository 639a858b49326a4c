// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for environment deserialization

use super::*;

#[test]
fn minimal_environment_has_no_repos_or_packages() {
    let env: Environment = serde_json::from_str(r#"{"os": "debian"}"#).unwrap();
    assert_eq!(env.os, "debian");
    assert!(env.repos.is_none());
    assert!(env.packages.is_none());
}

#[test]
fn full_environment_round_trips() {
    let env: Environment = serde_json::from_str(
        r#"{
            "os": "ubuntu",
            "repos": [{"url": "http://apt.example.com/pkgs", "components": "main contrib"}],
            "packages": ["build-essential", "git"]
        }"#,
    )
    .unwrap();
    let repos = env.repos.as_deref().unwrap();
    assert_eq!(repos[0].url, "http://apt.example.com/pkgs");
    assert_eq!(repos[0].components.as_deref(), Some("main contrib"));
    assert!(repos[0].key_id.is_none());
    assert_eq!(
        env.packages.as_deref(),
        Some(&["build-essential".to_string(), "git".to_string()][..])
    );
}

#[test]
fn repo_without_components_still_parses() {
    // Validation is the provisioner's job, not the parser's.
    let repo: RepoSpec = serde_json::from_str(r#"{"url": "http://x/y"}"#).unwrap();
    assert!(repo.components.is_none());
}
