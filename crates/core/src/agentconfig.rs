// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `AgentConfig` — additive agent configuration (instruction file content
//! plus plugins) referenced by Tasks.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A named skill or sub-agent within a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NamedBody {
    pub name: String,
    pub body: String,
}

/// A plugin: a named bundle of skills and sub-agents written into
/// `AXON_PLUGIN_DIR` by the `plugin-setup` init container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plugin {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<NamedBody>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<NamedBody>,
}

/// Desired state of an agent configuration bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, CustomResource)]
#[kube(group = "axon.io", version = "v1alpha1", kind = "AgentConfig", namespaced)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfigSpec {
    /// Content placed in the agent's instruction file (e.g. `CLAUDE.md`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub agents_md: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<Plugin>,
}

#[cfg(test)]
#[path = "agentconfig_tests.rs"]
mod tests;
