// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the command action

use super::*;
use crate::notifier::RecordingNotifier;
use crate::transport::FakeTransport;

fn create(json: &str) -> Box<dyn Action> {
    let payload: Box<RawValue> = serde_json::from_str(json).unwrap();
    CommandActionFactory.create(&payload).unwrap()
}

#[tokio::test]
async fn runs_the_command_and_reports_success() {
    let transport = FakeTransport::new();
    let notifier = RecordingNotifier::new();
    let mut action = create(r#"{"action": "command", "cmd": "make test"}"#);
    let mut ctx = ActionContext::new();
    action.prepare(Arc::new(transport.clone()), &mut ctx).await.unwrap();
    let result = action.perform(&notifier).await.unwrap();

    assert_eq!(result, ActionResult { success: true, exit_code: 0 });
    assert_eq!(transport.commands(), vec!["make test".to_string()]);
    assert_eq!(notifier.log_string(), "$ make test\n");
}

#[tokio::test]
async fn failure_carries_the_remote_exit_code() {
    let transport = FakeTransport::new();
    transport.fail_matching("make", 2);
    let notifier = RecordingNotifier::new();
    let mut action = create(r#"{"action": "command", "cmd": "make test"}"#);
    let mut ctx = ActionContext::new();
    action.prepare(Arc::new(transport), &mut ctx).await.unwrap();
    let result = action.perform(&notifier).await.unwrap();
    assert_eq!(result, ActionResult { success: false, exit_code: 2 });
}

#[tokio::test]
async fn path_and_sudo_flow_into_exec_options() {
    let transport = FakeTransport::new();
    let notifier = RecordingNotifier::new();
    let mut action =
        create(r#"{"action": "command", "cmd": "make install", "path": "/src", "sudo": true}"#);
    let mut ctx = ActionContext::new();
    action.prepare(Arc::new(transport.clone()), &mut ctx).await.unwrap();
    action.perform(&notifier).await.unwrap();

    let recorded = transport.recorded();
    assert!(recorded[0].sudo);
    assert_eq!(recorded[0].path.as_deref(), Some("/src"));
}

#[tokio::test]
async fn perform_without_prepare_is_an_error() {
    let notifier = RecordingNotifier::new();
    let mut action = create(r#"{"action": "command", "cmd": "true"}"#);
    let err = action.perform(&notifier).await.unwrap_err();
    assert!(matches!(err, ActionError::NotPrepared));
}

#[test]
fn malformed_payload_is_rejected_at_deserialization() {
    let payload: Box<RawValue> =
        serde_json::from_str(r#"{"action": "command", "cmd": 42}"#).unwrap();
    let err = CommandActionFactory.create(&payload).unwrap_err();
    assert!(matches!(err, ActionError::Malformed(_)), "got: {}", err);
}
