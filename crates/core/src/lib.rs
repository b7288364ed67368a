// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! axon-core: shared types for the axon Kubernetes agent orchestrator.
//!
//! Holds the `axon.io/v1alpha1` custom resource definitions (`Task`,
//! `TaskSpawner`, `Workspace`, `AgentConfig`), the constants both the
//! builder and the reconcilers need to agree on (label keys, finalizer
//! names, the agent container UID), the crate-wide error type, and a
//! [`Clock`] abstraction so reconciler logic that reasons about TTLs and
//! retry windows stays unit-testable.

pub mod agentconfig;
pub mod clock;
pub mod constants;
pub mod duration;
pub mod error;
pub mod task;
pub mod taskspawner;
pub mod workspace;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use agentconfig::{AgentConfig, AgentConfigSpec, Plugin};
pub use clock::{Clock, FakeClock, SystemClock};
pub use duration::parse_short_duration;
pub use error::{Error, Result};
pub use task::{
    Credentials, CredentialsType, PodOverrides, Task, TaskPhase, TaskSpec, TaskStatus, TaskType,
};
pub use taskspawner::{
    CronSource, GithubIssuesSource, TaskSpawner, TaskSpawnerPhase, TaskSpawnerSpec,
    TaskSpawnerStatus, TaskTemplate, When,
};
pub use workspace::{Workspace, WorkspaceFile, WorkspaceSpec};
