// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron source: each discovery cycle emits at most one `WorkItem`,
//! keyed to the schedule's most recent firing instant so re-running
//! the cycle within the same bucket never creates a duplicate Task.

use super::{Source, SourceError, WorkItem};
use async_trait::async_trait;
use axon_core::Clock;
use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;

pub struct CronTickSource<C: Clock> {
    schedule_expr: String,
    schedule: Schedule,
    clock: C,
}

impl<C: Clock> CronTickSource<C> {
    /// `schedule_expr` accepts both the standard 5-field unix form
    /// (`"0 9 * * *"`) and the `cron` crate's native 6-field form with
    /// a leading seconds slot — a bare 5-field expression is given an
    /// implicit `"0"` seconds slot so either form round-trips through
    /// `TaskSpawner.spec.when.cron.schedule` unchanged.
    pub fn new(schedule_expr: String, clock: C) -> Result<Self, SourceError> {
        let normalized = if schedule_expr.split_whitespace().count() == 5 {
            format!("0 {schedule_expr}")
        } else {
            schedule_expr.clone()
        };
        let schedule = Schedule::from_str(&normalized)
            .map_err(|e| SourceError::Other(format!("invalid cron schedule {schedule_expr:?}: {e}")))?;
        Ok(Self { schedule_expr, schedule, clock })
    }

    /// Most recent firing instant at or before `now`, searched back up
    /// to a year — far more than any realistic schedule needs a gap for.
    fn last_fire_before(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let search_start = now - chrono::Duration::days(366);
        self.schedule.after(&search_start).take_while(|t| *t <= now).last()
    }
}

#[async_trait]
impl<C: Clock> Source for CronTickSource<C> {
    async fn discover(&self) -> Result<Vec<WorkItem>, SourceError> {
        let now = self.clock.now();
        let Some(bucket) = self.last_fire_before(now) else {
            return Ok(Vec::new());
        };
        let id = format!("{}-{}", self.schedule_expr, bucket.timestamp());
        Ok(vec![WorkItem {
            id,
            number: None,
            title: format!("cron: {}", self.schedule_expr),
            body: String::new(),
            url: None,
            kind: "cron".to_string(),
            time: now,
            schedule: Some(self.schedule_expr.clone()),
            comments: Vec::new(),
            labels: Vec::new(),
        }])
    }
}

#[cfg(test)]
#[path = "cron_source_tests.rs"]
mod tests;
