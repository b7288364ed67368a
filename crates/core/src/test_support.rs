// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixture builders shared by `axon-builder` and `axon-controller` tests.

use crate::task::{Credentials, CredentialsType, TaskSpec, TaskType};
use crate::workspace::WorkspaceSpec;

pub fn task_spec(kind: TaskType, prompt: &str) -> TaskSpec {
    TaskSpec {
        kind,
        prompt: prompt.to_string(),
        credentials: Credentials { kind: CredentialsType::Oauth, secret_ref: "creds".to_string() },
        model: None,
        image: None,
        workspace_ref: None,
        agent_config_ref: None,
        ttl_seconds_after_finished: None,
        pod_overrides: None,
    }
}

pub fn workspace_spec(repo: &str) -> WorkspaceSpec {
    WorkspaceSpec { repo: repo.to_string(), r#ref: None, secret_ref: None, files: Vec::new() }
}
