// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsing for the short duration strings used in `pollInterval`
//! (`"5m"`, `"30s"`, `"1h"`) — the same Go-`time.Duration`-flavored
//! grammar the admission schema's default (`"5m"`) uses. Only single
//! `<integer><unit>` pairs are accepted; the Spawner Loop has no need
//! for compound durations like `"1h30m"`.

use crate::error::Error;
use std::time::Duration;

/// Parse a duration string with a single numeric value and a `s`/`m`/`h`
/// suffix into a [`Duration`].
pub fn parse_short_duration(s: &str) -> Result<Duration, Error> {
    let s = s.trim();
    let (digits, unit) = s.split_at(s.len().saturating_sub(1));
    if digits.is_empty() || unit.is_empty() {
        return Err(Error::Other(format!("invalid duration: {s:?}")));
    }
    let value: u64 =
        digits.parse().map_err(|_| Error::Other(format!("invalid duration: {s:?}")))?;
    let secs = match unit {
        "s" => value,
        "m" => value * 60,
        "h" => value * 3600,
        other => return Err(Error::Other(format!("unknown duration unit: {other:?}"))),
    };
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
