// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn extracts_lines_between_markers() {
    let log = "some preamble\n---AXON_OUTPUTS_START---\nline one\nline two\n---AXON_OUTPUTS_END---\ntrailer";
    assert_eq!(parse_outputs(log), Some(vec!["line one".to_string(), "line two".to_string()]));
}

#[test]
fn trims_and_drops_blank_lines() {
    let log = "---AXON_OUTPUTS_START---\n  spaced  \n\n  \n---AXON_OUTPUTS_END---";
    assert_eq!(parse_outputs(log), Some(vec!["spaced".to_string()]));
}

#[test]
fn none_when_markers_absent() {
    assert_eq!(parse_outputs("just some log output"), None);
}

#[test]
fn none_when_start_without_end() {
    let log = "---AXON_OUTPUTS_START---\nline one";
    assert_eq!(parse_outputs(log), None);
}

#[test]
fn none_when_end_before_start() {
    let log = "---AXON_OUTPUTS_END---\nstuff\n---AXON_OUTPUTS_START---";
    assert_eq!(parse_outputs(log), None);
}

#[test]
fn none_when_block_empty() {
    let log = "---AXON_OUTPUTS_START---\n   \n---AXON_OUTPUTS_END---";
    assert_eq!(parse_outputs(log), None);
}
