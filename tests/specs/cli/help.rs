//! Help output and argument-parsing specs for the `axon` binary.

use crate::prelude::*;

#[test]
fn no_args_shows_usage_and_exits_nonzero() {
    let output = cli().output().unwrap();
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Usage:"));
}

#[test]
fn top_level_help_lists_every_subcommand() {
    let output = cli().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    for subcommand in ["install", "uninstall", "get", "logs"] {
        assert!(stdout.contains(subcommand), "missing {subcommand} in:\n{stdout}");
    }
}

#[test]
fn version_flag_prints_version() {
    let output = cli().arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("axon"));
}

#[test]
fn install_help_shows_dry_run_flag() {
    let output = cli().args(["install", "--help"]).output().unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("--dry-run"));
}

#[test]
fn get_rejects_unknown_kind() {
    let output = cli().args(["get", "not-a-real-kind"]).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn logs_requires_a_task_name() {
    let output = cli().arg("logs").output().unwrap();
    assert!(!output.status.success());
}
