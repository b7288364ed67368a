// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use axon_core::FakeClock;
use chrono::{DateTime, Utc};

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

#[tokio::test]
async fn same_bucket_yields_the_same_item_id() {
    let clock = FakeClock::new(at("2026-01-01T00:00:30Z"));
    let source = CronTickSource::new("0 * * * * *".to_string(), clock.clone()).unwrap();
    let first = source.discover().await.unwrap();
    clock.advance(chrono::Duration::seconds(10));
    let second = source.discover().await.unwrap();
    assert_eq!(first[0].id, second[0].id);
}

#[tokio::test]
async fn crossing_a_boundary_yields_a_new_bucket_id() {
    let clock = FakeClock::new(at("2026-01-01T00:00:05Z"));
    let source = CronTickSource::new("0 * * * * *".to_string(), clock.clone()).unwrap();
    let first = source.discover().await.unwrap();
    clock.advance(chrono::Duration::minutes(1));
    let second = source.discover().await.unwrap();
    assert_ne!(first[0].id, second[0].id);
}
