// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extraction of `status.outputs` from the marker-delimited block in
//! agent stdout.

use axon_core::constants::{OUTPUTS_END_MARKER, OUTPUTS_START_MARKER};

/// Parse the text between the literal marker lines.
///
/// Returns `None` if the markers are absent or malformed: end before
/// start, start without a matching end, or nothing but whitespace
/// between them. Each non-empty, trimmed line inside the block becomes
/// one output entry.
pub fn parse_outputs(log: &str) -> Option<Vec<String>> {
    let start = log.find(OUTPUTS_START_MARKER)?;
    let after_start = start + OUTPUTS_START_MARKER.len();
    let end = log[after_start..].find(OUTPUTS_END_MARKER)? + after_start;

    let body = &log[after_start..end];
    if body.trim().is_empty() {
        return None;
    }

    let lines: Vec<String> =
        body.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines)
    }
}

#[cfg(test)]
#[path = "outputs_tests.rs"]
mod tests;
