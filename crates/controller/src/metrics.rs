// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prometheus metrics for both reconcilers, exposed on `--metrics-bind-address`.

use prometheus::{HistogramVec, IntCounterVec, Registry};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub reconciliations: IntCounterVec,
    pub reconcile_errors: IntCounterVec,
    pub reconcile_duration: HistogramVec,
}

impl Metrics {
    // Metric names and label sets below are fixed string literals; registration
    // only fails on duplicate names or malformed specs, neither possible here.
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let registry = Registry::new();

        let reconciliations = IntCounterVec::new(
            prometheus::Opts::new("axon_reconciliations_total", "Reconcile invocations by kind"),
            &["kind"],
        )
        .expect("metric definitions are static and known-valid");
        let reconcile_errors = IntCounterVec::new(
            prometheus::Opts::new("axon_reconcile_errors_total", "Reconcile invocations that errored"),
            &["kind"],
        )
        .expect("metric definitions are static and known-valid");
        let reconcile_duration = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "axon_reconcile_duration_seconds",
                "Reconcile wall-clock duration",
            ),
            &["kind"],
        )
        .expect("metric definitions are static and known-valid");

        registry.register(Box::new(reconciliations.clone())).expect("metric name is unique");
        registry.register(Box::new(reconcile_errors.clone())).expect("metric name is unique");
        registry.register(Box::new(reconcile_duration.clone())).expect("metric name is unique");

        Self { registry, reconciliations, reconcile_errors, reconcile_duration }
    }

    pub fn gather(&self) -> String {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let families = self.registry.gather();
        let mut buf = Vec::new();
        if encoder.encode(&families, &mut buf).is_err() {
            return String::new();
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
