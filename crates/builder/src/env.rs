// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment variable derivation for the Task main container.
//!
//! Order matters — built-ins win on name collision with user-supplied
//! overrides, so `build_env` appends in a fixed sequence (model, then
//! credential, then GitHub host/token, then AGENTS.md, then plugin
//! dir), then filters the user overrides last.

use axon_core::task::{CredentialsType, TaskType};
use k8s_openapi::api::core::v1::{EnvVar, EnvVarSource, SecretKeySelector};
use std::collections::BTreeSet;

/// The env var name a Secret key is projected into for a given
/// `(agentType, credentialType)` pair.
pub fn credential_env_name(kind: TaskType, cred: CredentialsType) -> &'static str {
    match (kind, cred) {
        (TaskType::ClaudeCode, CredentialsType::ApiKey) => "ANTHROPIC_API_KEY",
        (TaskType::ClaudeCode, CredentialsType::Oauth) => "CLAUDE_CODE_OAUTH_TOKEN",
        (TaskType::Codex, _) => "CODEX_API_KEY",
        (TaskType::Gemini, _) => "GEMINI_API_KEY",
    }
}

fn env_value(name: &str, value: String) -> EnvVar {
    EnvVar { name: name.to_string(), value: Some(value), ..Default::default() }
}

fn env_secret(name: &str, secret_name: &str, key: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: secret_name.to_string(),
                key: key.to_string(),
                optional: None,
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Inputs to environment derivation, already resolved from the Task,
/// Workspace, and AgentConfig specs by the caller.
pub struct EnvInputs<'a> {
    pub task_type: TaskType,
    pub model: Option<&'a str>,
    pub credential_secret_ref: &'a str,
    pub credential_kind: CredentialsType,
    /// `(host, has_secret_ref)` for the workspace, if one is attached.
    pub workspace_host: Option<&'a str>,
    pub workspace_secret_ref: Option<&'a str>,
    pub agents_md: Option<&'a str>,
    pub has_plugins: bool,
    pub user_env: &'a [(String, String)],
}

/// Build the main container's environment list in built-in-first order,
/// filtering user overrides to names not already set.
pub fn build_env(inputs: &EnvInputs<'_>) -> Vec<EnvVar> {
    let mut env = Vec::new();
    let mut set_names: BTreeSet<&str> = BTreeSet::new();

    // 1. AXON_MODEL
    if let Some(model) = inputs.model {
        env.push(env_value("AXON_MODEL", model.to_string()));
        set_names.insert("AXON_MODEL");
    }

    // 2. credential env
    let cred_name = credential_env_name(inputs.task_type, inputs.credential_kind);
    env.push(env_secret(cred_name, inputs.credential_secret_ref, cred_name));
    set_names.insert(cred_name);

    // 3. GH_HOST for enterprise hosts
    let is_enterprise =
        inputs.workspace_host.map(crate::repo_url::is_enterprise_host).unwrap_or(false);
    if is_enterprise {
        let host = inputs.workspace_host.unwrap_or_default();
        env.push(env_value("GH_HOST", host.to_string()));
        set_names.insert("GH_HOST");
    }

    // 4. GITHUB_TOKEN + GH_TOKEN/GH_ENTERPRISE_TOKEN alias
    if let Some(secret_ref) = inputs.workspace_secret_ref {
        env.push(env_secret("GITHUB_TOKEN", secret_ref, "GITHUB_TOKEN"));
        set_names.insert("GITHUB_TOKEN");
        let alias = if is_enterprise { "GH_ENTERPRISE_TOKEN" } else { "GH_TOKEN" };
        env.push(env_secret(alias, secret_ref, "GITHUB_TOKEN"));
        set_names.insert(alias);
    }

    // 5. AXON_AGENTS_MD
    if let Some(md) = inputs.agents_md {
        if !md.is_empty() {
            env.push(env_value("AXON_AGENTS_MD", md.to_string()));
            set_names.insert("AXON_AGENTS_MD");
        }
    }

    // 6. AXON_PLUGIN_DIR
    if inputs.has_plugins {
        env.push(env_value("AXON_PLUGIN_DIR", axon_core::constants::PLUGIN_PATH.to_string()));
        set_names.insert("AXON_PLUGIN_DIR");
    }

    // 7. user overrides, filtered to names not already set
    for (name, value) in inputs.user_env {
        if !set_names.contains(name.as_str()) {
            env.push(env_value(name, value.clone()));
            set_names.insert(name.as_str());
        }
    }

    env
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
