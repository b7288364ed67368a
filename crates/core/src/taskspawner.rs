// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `TaskSpawner` — declares a recurring source of work materialized into
//! a Deployment running the Spawner Loop.

use crate::error::BuildError;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// GitHub issues (optionally PRs) as a discovery source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GithubIssuesSource {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub include_prs: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_labels: Vec<String>,
    #[serde(default = "default_state")]
    pub state: String,
}

fn default_state() -> String {
    "open".to_string()
}

/// A cron-ticked source: one `WorkItem` is emitted per firing instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CronSource {
    pub schedule: String,
}

/// Exactly one of `github_issues`/`cron` must be set; enforced in code
/// (see `axon_builder::BuildError::InvalidWhen`) since admission-schema
/// `oneOf` is not portably expressible here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct When {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_issues: Option<GithubIssuesSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron: Option<CronSource>,
}

impl When {
    /// Validates the oneOf invariant, returning the selected variant name
    /// on success.
    pub fn validate(&self) -> Result<&'static str, BuildError> {
        match (&self.github_issues, &self.cron) {
            (Some(_), None) => Ok("githubIssues"),
            (None, Some(_)) => Ok("cron"),
            (None, None) => Err(BuildError::InvalidWhen("neither set")),
            (Some(_), Some(_)) => Err(BuildError::InvalidWhen("both set")),
        }
    }
}

/// Spec fragments copied into each Task this spawner creates, plus the
/// prompt template rendered per discovered item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<crate::task::TaskType>,
    pub prompt_template: String,
    pub credentials: crate::task::Credentials,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_config_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_seconds_after_finished: Option<i64>,
}

/// Desired state of a TaskSpawner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, CustomResource)]
#[kube(
    group = "axon.io",
    version = "v1alpha1",
    kind = "TaskSpawner",
    namespaced,
    status = "TaskSpawnerStatus",
    shortname = "spawner"
)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpawnerSpec {
    pub when: When,
    pub task_template: TaskTemplate,
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<u32>,
}

fn default_poll_interval() -> String {
    "5m".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum TaskSpawnerPhase {
    #[default]
    Pending,
    Running,
    Failed,
}

/// Observed state of a TaskSpawner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpawnerStatus {
    #[serde(default)]
    pub phase: TaskSpawnerPhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_name: Option<String>,
    #[serde(default)]
    pub total_discovered: u64,
    #[serde(default)]
    pub total_tasks_created: u64,
    #[serde(default)]
    pub active_tasks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_discovery_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
#[path = "taskspawner_tests.rs"]
mod tests;
