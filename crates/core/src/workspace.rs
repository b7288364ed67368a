// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Workspace` — declares a git repository Tasks and Spawners can check out.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One file to inject into the checkout before the agent starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceFile {
    /// Path relative to the repo root. Sanitized at build time — see
    /// `axon_builder::sanitize::sanitize_relative_path`.
    pub path: String,
    /// Raw file content (not base64 — the builder base64-encodes it into
    /// the init container script).
    pub content: String,
}

/// Desired state of a git workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, CustomResource)]
#[kube(group = "axon.io", version = "v1alpha1", kind = "Workspace", namespaced)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSpec {
    /// Repository URL. Validated at admission against
    /// `^(https?://|git://|git@).*`.
    pub repo: String,
    /// Optional branch, tag, or SHA to clone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#ref: Option<String>,
    /// Name of a Secret in the same namespace holding `GITHUB_TOKEN`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<String>,
    /// Files to inject into the checkout before the agent starts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<WorkspaceFile>,
}

impl Default for WorkspaceSpec {
    fn default() -> Self {
        Self { repo: String::new(), r#ref: None, secret_ref: None, files: Vec::new() }
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
