// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn deterministic_name_is_stable_and_namespaced_by_spawner() {
    let a = deterministic_task_name("spawner-a", "issue-42");
    let b = deterministic_task_name("spawner-a", "issue-42");
    let c = deterministic_task_name("spawner-b", "issue-42");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.starts_with("spawner-a-"));
}

#[test]
fn task_phase_is_terminal_drives_active_count() {
    assert!(!TaskPhase::Pending.is_terminal());
    assert!(TaskPhase::Succeeded.is_terminal());
}
