// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared reconciler context threaded through both controllers.

use axon_builder::ImageDefaults;
use axon_core::Clock;
use std::sync::Arc;

use crate::metrics::Metrics;

/// Everything a reconcile function needs besides the object it was
/// handed: the API client, the image defaults the builder fills in
/// when a Task or TaskSpawner doesn't override them, a clock (so TTL
/// and retry-window logic stays testable behind [`axon_core::FakeClock`]),
/// and the metrics registry.
pub struct Context<C: Clock = axon_core::SystemClock> {
    pub client: kube::Client,
    pub images: ImageDefaults,
    pub spawner_image: String,
    pub clock: C,
    pub metrics: Metrics,
}

pub type ArcContext<C = axon_core::SystemClock> = Arc<Context<C>>;
