// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job lifecycle specs
//!
//! Verify the externally observable status sequence and log output for
//! whole jobs submitted as serialized payloads.

use crate::prelude::*;
use rig_core::JobStatus;
use serde_json::json;

#[tokio::test]
async fn single_succeeding_stage_ends_succeeded() {
    let world = JobWorld::new();
    let payload = job(json!({"build": {"steps": [cmd("make")]}}), &["build"]);

    let status = world.submit(&payload).await.unwrap();

    assert_eq!(status, JobStatus::Succeeded);
    assert_eq!(
        world.statuses(),
        vec![JobStatus::Waiting, JobStatus::Started, JobStatus::Succeeded]
    );
    // The stage command ran after provisioning.
    assert_eq!(world.transport.commands().last().unwrap(), "make");
    assert!(world.notifier.log_string().contains("$ make\n"));
    assert_eq!(world.notifier.ended_at_epoch_ms(), Some(1_000_000));
}

#[tokio::test]
async fn fail_then_compensate_passes_through_failing_and_ends_failed() {
    let world = JobWorld::new();
    world.transport.fail_matching("deploy", 1);
    let payload = job(
        json!({
            "deploy": {"steps": [cmd("deploy")], "on_failure": "rollback"},
            "rollback": {"steps": [cmd("rollback")]},
        }),
        &["deploy"],
    );

    let status = world.submit(&payload).await.unwrap();

    assert_eq!(status, JobStatus::Failed);
    assert_eq!(
        world.statuses(),
        vec![
            JobStatus::Waiting,
            JobStatus::Started,
            JobStatus::Failing,
            JobStatus::Failed
        ]
    );
    // The compensating stage ran even though the failure stuck.
    let commands = world.transport.commands();
    assert!(commands.contains(&"deploy".to_string()));
    assert!(commands.contains(&"rollback".to_string()));
}

#[tokio::test]
async fn status_wire_values_match_the_observer_contract() {
    let world = JobWorld::new();
    let payload = job(json!({"noop": {}}), &["noop"]);

    world.submit(&payload).await.unwrap();

    let wire: Vec<String> = world.statuses().iter().map(|s| s.to_string()).collect();
    assert_eq!(wire, vec!["WAITING", "STARTED", "SUCCEEDED"]);
}

#[tokio::test]
async fn cancelled_job_ends_failed_without_running_steps() {
    let world = JobWorld::new();
    world.cancel.cancel();
    let payload = job(json!({"build": {"steps": [cmd("make")]}}), &["build"]);

    let err = world.submit(&payload).await.unwrap_err();

    assert_eq!(err.to_string(), "job was cancelled");
    assert_eq!(world.notifier.last_status(), Some(JobStatus::Failed));
    assert!(!world.transport.commands().contains(&"make".to_string()));
}

#[tokio::test]
async fn job_log_accumulates_step_commands_in_order() {
    let world = JobWorld::new();
    let payload = job(
        json!({
            "build": {"steps": [cmd("configure"), cmd("make")], "on_success": "test"},
            "test": {"steps": [cmd("make check")]},
        }),
        &["build"],
    );

    world.submit(&payload).await.unwrap();

    let log = world.notifier.log_string();
    let configure = log.find("$ configure\n").unwrap();
    let make = log.find("$ make\n").unwrap();
    let check = log.find("$ make check\n").unwrap();
    assert!(configure < make && make < check);
}
