//! `axon get`/`axon logs` argument-parsing specs. Both talk to a real
//! cluster once parsing succeeds, so these only cover the part that
//! doesn't need one: rejecting bad input before ever dialing out.

use crate::prelude::*;

#[test]
fn get_task_without_a_cluster_fails_but_parses_the_kind() {
    // No kubeconfig is guaranteed to be present in CI, so this can only
    // assert the command gets past argument parsing and fails later,
    // on the connection attempt, not on usage.
    let output = cli().args(["get", "task"]).output().unwrap();
    assert!(!stderr_of(&output).contains("Usage:"), "should not be a usage error:\n{}", stderr_of(&output));
}

#[test]
fn get_accepts_taskspawner_kind() {
    let output = cli().args(["get", "taskspawner"]).output().unwrap();
    assert!(
        !stderr_of(&output).contains("Usage:"),
        "should not be a usage error:\n{}",
        stderr_of(&output)
    );
}

#[test]
fn logs_accepts_outputs_and_follow_flags() {
    let output = cli().args(["logs", "some-task", "--outputs", "--follow"]).output().unwrap();
    assert!(
        !stderr_of(&output).contains("Usage:"),
        "should not be a usage error:\n{}",
        stderr_of(&output)
    );
}
