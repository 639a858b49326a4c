// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the Debian provisioner

use super::*;
use crate::builder::BuildHost;
use crate::transport::FakeTransport;

fn env(repos: Option<Vec<RepoSpec>>, packages: Option<Vec<String>>) -> Environment {
    Environment {
        os: "debian".to_string(),
        repos,
        packages,
    }
}

fn repo(url: &str, components: Option<&str>, key_id: Option<&str>) -> RepoSpec {
    RepoSpec {
        url: url.to_string(),
        components: components.map(str::to_string),
        key_id: key_id.map(str::to_string),
    }
}

async fn prepare(transport: &FakeTransport, environment: &Environment) -> Result<(), ProvisionError> {
    DebianProvisioner::new()
        .prepare(transport, &BuildHost::fake(), environment)
        .await
}

#[tokio::test]
async fn empty_environment_only_refreshes_the_index() {
    let transport = FakeTransport::new();
    prepare(&transport, &env(None, None)).await.unwrap();
    assert_eq!(transport.commands(), vec!["apt-get update -qq".to_string()]);
    assert_eq!(
        transport.exports(),
        vec![("DEBIAN_FRONTEND".to_string(), "noninteractive".to_string())]
    );
}

#[tokio::test]
async fn every_provisioning_command_is_privileged() {
    let transport = FakeTransport::new();
    let environment = env(
        Some(vec![repo("http://x/y", Some("main"), None)]),
        Some(vec!["git".to_string()]),
    );
    prepare(&transport, &environment).await.unwrap();
    assert!(transport.recorded().iter().all(|c| c.sudo));
}

async fn check_repo_write_runs_between_two_index_refreshes(url: &str) {
    let transport = FakeTransport::new();
    let environment = env(Some(vec![repo(url, Some("main contrib"), None)]), None);
    prepare(&transport, &environment).await.unwrap();

    let commands = transport.commands();
    assert_eq!(commands.len(), 3);
    assert_eq!(commands[0], "apt-get update -qq");
    assert!(commands[1].contains(&format!("deb {} bookworm main contrib", url)));
    assert!(commands[1].contains("tee -a /etc/apt/sources.list.d/rig.list"));
    assert_eq!(commands[2], "apt-get update -q");
}

#[tokio::test]
async fn http_repo_write_runs_between_two_index_refreshes() {
    check_repo_write_runs_between_two_index_refreshes("http://apt.example.com/pkgs").await;
}

#[tokio::test]
async fn https_repo_write_runs_between_two_index_refreshes() {
    check_repo_write_runs_between_two_index_refreshes("https://apt.example.com/pkgs").await;
}

#[tokio::test]
async fn non_http_repos_are_skipped() {
    let transport = FakeTransport::new();
    let environment = env(Some(vec![repo("ftp://old.example.com/pkgs", None, None)]), None);
    prepare(&transport, &environment).await.unwrap();
    // No fragment write, but the post-repo refresh still runs.
    assert_eq!(
        transport.commands(),
        vec!["apt-get update -qq".to_string(), "apt-get update -q".to_string()]
    );
}

#[tokio::test]
async fn signing_key_is_fetched_and_trusted() {
    let transport = FakeTransport::new();
    let environment = env(
        Some(vec![repo("http://x/y", Some("main"), Some("ABCDEF01"))]),
        None,
    );
    prepare(&transport, &environment).await.unwrap();

    let commands = transport.commands();
    assert_eq!(commands.len(), 5);
    assert_eq!(
        commands[2],
        "gpg --keyserver keyserver.ubuntu.com --recv-keys ABCDEF01"
    );
    assert_eq!(commands[3], "sh -c 'gpg -a --export ABCDEF01 | apt-key add -'");
}

#[tokio::test]
async fn missing_components_fails_before_any_repo_command() {
    let transport = FakeTransport::new();
    let environment = env(Some(vec![repo("http://x/y", None, None)]), None);
    let err = prepare(&transport, &environment).await.unwrap_err();
    assert!(
        matches!(err, ProvisionError::MissingComponents { ref url } if url == "http://x/y"),
        "got: {}",
        err
    );
    // Only the initial index refresh ran; nothing was issued for the repo.
    assert_eq!(transport.commands(), vec!["apt-get update -qq".to_string()]);
}

#[tokio::test]
async fn packages_install_in_one_command() {
    let transport = FakeTransport::new();
    let environment = env(None, Some(vec!["foo".to_string(), "bar".to_string()]));
    prepare(&transport, &environment).await.unwrap();
    assert_eq!(
        transport.commands(),
        vec![
            "apt-get update -qq".to_string(),
            "apt-get install -q -y foo bar".to_string()
        ]
    );
}

#[tokio::test]
async fn failed_install_names_every_package() {
    let transport = FakeTransport::new();
    transport.fail_matching("apt-get install", 100);
    let environment = env(None, Some(vec!["foo".to_string(), "bar".to_string()]));
    let err = prepare(&transport, &environment).await.unwrap_err();
    assert!(err.to_string().contains("foo bar"), "got: {}", err);
}

#[tokio::test]
async fn failed_initial_refresh_fails_fast() {
    let transport = FakeTransport::new();
    transport.fail_matching("apt-get update -qq", 100);
    let environment = env(None, Some(vec!["git".to_string()]));
    let err = prepare(&transport, &environment).await.unwrap_err();
    assert!(err.to_string().contains("update"), "got: {}", err);
    // Nothing runs after the failed refresh.
    assert_eq!(transport.commands().len(), 1);
}

#[tokio::test]
async fn failed_fragment_write_stops_the_repo_chain() {
    let transport = FakeTransport::new();
    transport.fail_matching("tee -a", 1);
    let environment = env(
        Some(vec![repo("http://x/y", Some("main"), Some("ABCDEF01"))]),
        None,
    );
    let err = prepare(&transport, &environment).await.unwrap_err();
    assert!(err.to_string().contains("http://x/y"), "got: {}", err);
    // The key import never ran.
    assert!(transport.commands().iter().all(|c| !c.contains("gpg")));
}

#[tokio::test]
async fn failed_key_import_fails_provisioning() {
    let transport = FakeTransport::new();
    transport.fail_matching("--recv-keys", 2);
    let environment = env(
        Some(vec![repo("http://x/y", Some("main"), Some("ABCDEF01"))]),
        None,
    );
    let err = prepare(&transport, &environment).await.unwrap_err();
    assert!(err.to_string().contains("ABCDEF01"), "got: {}", err);
}
