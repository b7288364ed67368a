// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! axon-builder: the Workload Builder.
//!
//! Pure, deterministic translation from the desired-state CRDs (`Task`,
//! `TaskSpawner`, `Workspace`, `AgentConfig`) to the Kubernetes workload
//! objects (`Job`, `Deployment`) that carry them out. Nothing in this
//! crate reads the clock, touches the network, or talks to the API
//! server — reconcilers own that; this crate owns only the translation,
//! so it can be exhaustively unit tested and so drift detection can
//! compare "what we'd build now" against "what's running" without a
//! cluster.

pub mod deployment;
pub mod env;
pub mod job;
pub mod outputs;
pub mod rbac;
pub mod repo_url;
pub mod sanitize;

pub use deployment::{build_spawner_deployment, diff_deployment, DeploymentDrift};
pub use env::{build_env, credential_env_name, EnvInputs};
pub use job::{build_task_job, ImageDefaults};
pub use outputs::parse_outputs;
pub use rbac::{build_spawner_role_binding, build_spawner_service_account, SPAWNER_CLUSTER_ROLE};
pub use repo_url::{is_enterprise_host, parse_repo_url, RepoRef};
pub use sanitize::{sanitize_name, sanitize_relative_path};
