// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Constants shared between the Workload Builder and the reconcilers.
//!
//! These are a contract, not configuration — the agent container images
//! are built against the entrypoint path and the UID below, so changing
//! them here is a breaking change for every published agent image.

/// Entrypoint every agent container image must expose.
pub const ENTRYPOINT_PATH: &str = "/axon_entrypoint.sh";

/// Fixed UID agent and git-clone images run as, shared via `fsGroup` so
/// files written by the init containers are readable by the main container.
pub const AGENT_UID: i64 = 61100;

/// Root of the workspace EmptyDir volume mount.
pub const WORKSPACE_PATH: &str = "/axon/workspace";

/// Relative directory within the workspace volume the repo is cloned into.
pub const WORKSPACE_REPO_SUBDIR: &str = "repo";

/// Root of the plugin EmptyDir volume mount.
pub const PLUGIN_PATH: &str = "/axon/plugin";

/// Name of the finalizer placed on every live `Task`.
pub const TASK_FINALIZER: &str = "axon.io/finalizer";

/// Name of the finalizer placed on every live `TaskSpawner`.
pub const TASKSPAWNER_FINALIZER: &str = "axon.io/taskspawner-finalizer";

/// Label identifying the Task that owns a child Job/Pod.
pub const LABEL_TASK: &str = "axon.io/task";

/// Label identifying the TaskSpawner that created a Task.
pub const LABEL_TASKSPAWNER: &str = "axon.io/taskspawner";

pub const LABEL_APP: &str = "app.kubernetes.io/name";
pub const LABEL_APP_VALUE: &str = "axon";
pub const LABEL_COMPONENT: &str = "app.kubernetes.io/component";
pub const LABEL_COMPONENT_TASK: &str = "task";
pub const LABEL_COMPONENT_SPAWNER: &str = "spawner";
pub const LABEL_MANAGED_BY: &str = "app.kubernetes.io/managed-by";
pub const LABEL_MANAGED_BY_VALUE: &str = "axon-controller";

/// Fixed ServiceAccount name spawner Deployments run under.
pub const SPAWNER_SERVICE_ACCOUNT: &str = "axon-spawner";

/// Literal markers bounding the output block in agent stdout.
pub const OUTPUTS_START_MARKER: &str = "---AXON_OUTPUTS_START---";
pub const OUTPUTS_END_MARKER: &str = "---AXON_OUTPUTS_END---";

/// Output-capture retry window and interval. Fixed constants, not an
/// operator knob.
pub const OUTPUT_CAPTURE_RETRY_WINDOW_SECS: i64 = 30;
pub const OUTPUT_CAPTURE_RETRY_INTERVAL_SECS: u64 = 5;

/// Requeue delay used when a referenced Workspace/AgentConfig is missing.
pub const MISSING_REFERENCE_REQUEUE_SECS: u64 = 2;

/// Number of tail lines read from the Pod log when capturing outputs.
pub const OUTPUT_LOG_TAIL_LINES: i64 = 50;

pub fn child_labels(component: &str) -> std::collections::BTreeMap<String, String> {
    std::collections::BTreeMap::from([
        (LABEL_APP.to_string(), LABEL_APP_VALUE.to_string()),
        (LABEL_COMPONENT.to_string(), component.to_string()),
        (LABEL_MANAGED_BY.to_string(), LABEL_MANAGED_BY_VALUE.to_string()),
    ])
}
