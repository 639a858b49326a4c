// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host provisioning specs
//!
//! Verify that a job's package environment is prepared on the build host
//! before any stage runs, and that provisioning failures fail the job
//! without reaching the stage graph.

use crate::prelude::*;
use rig_core::JobStatus;
use serde_json::json;

fn job_with_environment(environment: serde_json::Value) -> String {
    json!({
        "environment": environment,
        "stages": {"build": {"steps": [cmd("make")]}},
        "sequence": ["build"],
    })
    .to_string()
}

#[tokio::test]
async fn packages_install_before_the_first_stage() {
    let world = JobWorld::new();
    let payload = job_with_environment(json!({
        "os": "debian",
        "packages": ["git", "build-essential"],
    }));

    let status = world.submit(&payload).await.unwrap();

    assert_eq!(status, JobStatus::Succeeded);
    assert_eq!(
        world.transport.commands(),
        vec![
            "apt-get update -qq".to_string(),
            "apt-get install -q -y git build-essential".to_string(),
            "make".to_string(),
        ]
    );
    assert_eq!(
        world.transport.exports(),
        vec![("DEBIAN_FRONTEND".to_string(), "noninteractive".to_string())]
    );
}

#[tokio::test]
async fn extra_repositories_are_added_before_installs() {
    let world = JobWorld::new();
    let payload = job_with_environment(json!({
        "os": "debian",
        "repos": [{"url": "http://apt.example.com/rig", "components": "main"}],
        "packages": ["rig-tools"],
    }));

    world.submit(&payload).await.unwrap();

    let commands = world.transport.commands();
    assert_eq!(commands[0], "apt-get update -qq");
    assert!(commands[1].contains("deb http://apt.example.com/rig bookworm main"));
    assert_eq!(commands[2], "apt-get update -q");
    assert_eq!(commands[3], "apt-get install -q -y rig-tools");
    assert_eq!(commands[4], "make");
}

#[tokio::test]
async fn provisioning_failure_fails_the_job_before_any_stage() {
    let world = JobWorld::new();
    world.transport.fail_matching("apt-get install", 100);
    let payload = job_with_environment(json!({
        "os": "debian",
        "packages": ["nonexistent-package"],
    }));

    let err = world.submit(&payload).await.unwrap_err();

    assert!(
        err.to_string().contains("nonexistent-package"),
        "got: {}",
        err
    );
    // Construction failed, so the job never started.
    assert_eq!(
        world.statuses(),
        vec![JobStatus::Waiting, JobStatus::Failed]
    );
    assert!(!world.transport.commands().contains(&"make".to_string()));
    assert!(world.notifier.ended_at_epoch_ms().is_some());
}

#[tokio::test]
async fn repo_without_components_is_a_configuration_error() {
    let world = JobWorld::new();
    let payload = job_with_environment(json!({
        "os": "debian",
        "repos": [{"url": "http://apt.example.com/rig"}],
    }));

    let err = world.submit(&payload).await.unwrap_err();

    assert!(
        err.to_string().contains("http://apt.example.com/rig"),
        "got: {}",
        err
    );
    assert_eq!(world.notifier.last_status(), Some(JobStatus::Failed));
    // The malformed repo never produced a remote command.
    assert_eq!(
        world.transport.commands(),
        vec!["apt-get update -qq".to_string()]
    );
}
