// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn terminal_phases_are_succeeded_and_failed_only() {
    assert!(!TaskPhase::Pending.is_terminal());
    assert!(!TaskPhase::Running.is_terminal());
    assert!(TaskPhase::Succeeded.is_terminal());
    assert!(TaskPhase::Failed.is_terminal());
}

#[test]
fn task_type_wire_form_is_kebab_case() {
    assert_eq!(serde_json::to_value(TaskType::ClaudeCode).unwrap(), "claude-code");
    assert_eq!(serde_json::to_value(TaskType::Codex).unwrap(), "codex");
    assert_eq!(serde_json::to_value(TaskType::Gemini).unwrap(), "gemini");
}

#[test]
fn status_roundtrips() {
    let status = TaskStatus {
        phase: TaskPhase::Succeeded,
        job_name: Some("t-job".to_string()),
        pod_name: Some("t-pod".to_string()),
        start_time: Some("2026-01-01T00:00:00Z".to_string()),
        completion_time: Some("2026-01-01T00:05:00Z".to_string()),
        message: None,
        outputs: Some(vec!["line one".to_string()]),
    };
    let json = serde_json::to_string(&status).unwrap();
    let back: TaskStatus = serde_json::from_str(&json).unwrap();
    assert_eq!(status, back);
}
