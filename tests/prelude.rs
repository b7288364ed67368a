// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for the `specs` integration test binary.

use assert_cmd::Command;

/// A `Command` for the `axon` binary built by this workspace.
pub fn cli() -> Command {
    Command::cargo_bin("axon").expect("axon binary is built as part of the workspace")
}

pub fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
