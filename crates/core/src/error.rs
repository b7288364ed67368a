// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crate-wide error type threaded through reconcile functions via `?`.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced across the builder and reconcilers.
///
/// Transient variants (`Kube`) are returned from reconcile functions so
/// the controller framework retries with backoff. `Build` carries the
/// permanent, non-retried build-time failures (unsupported agent type,
/// unsanitizable path). `MissingReference` signals a short requeue with
/// no status change.
#[derive(Debug, Error)]
pub enum Error {
    #[error("kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("finalizer error: {0}")]
    Finalizer(String),

    #[error("build error: {0}")]
    Build(#[from] crate::error::BuildError),

    #[error("referenced {kind} {name:?} not found")]
    MissingReference { kind: &'static str, name: String },

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Permanent, build-time-only failures from the Workload Builder.
///
/// These never come from I/O — the builder is pure — so a reconciler
/// that receives one writes a terminal `Failed` status instead of
/// retrying.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("unsupported agent type: {0}")]
    UnsupportedAgentType(String),

    #[error("unsanitizable workspace file path: {0:?}")]
    UnsanitizablePath(String),

    #[error("unsanitizable plugin or skill name: {0:?}")]
    UnsanitizableName(String),

    #[error("invalid repository URL: {0:?}")]
    InvalidRepoUrl(String),

    #[error("taskspawner.spec.when must have exactly one of githubIssues/cron, got {0}")]
    InvalidWhen(&'static str),
}
