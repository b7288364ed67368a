// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use axon_core::task::{Credentials, CredentialsType, TaskType};
use axon_core::taskspawner::{CronSource, GithubIssuesSource, TaskTemplate, When};

fn spec_with_github() -> TaskSpawnerSpec {
    TaskSpawnerSpec {
        when: When {
            github_issues: Some(GithubIssuesSource {
                owner: "acme".to_string(),
                repo: "widgets".to_string(),
                include_prs: false,
                labels: vec![],
                exclude_labels: vec![],
                state: "open".to_string(),
            }),
            cron: None,
        },
        task_template: TaskTemplate {
            kind: Some(TaskType::ClaudeCode),
            prompt_template: "fix {{title}}".to_string(),
            credentials: Credentials { kind: CredentialsType::Oauth, secret_ref: "creds".to_string() },
            model: None,
            image: None,
            workspace_ref: None,
            agent_config_ref: None,
            ttl_seconds_after_finished: None,
        },
        poll_interval: "5m".to_string(),
        max_concurrency: None,
    }
}

#[test]
fn builds_single_replica_deployment_with_spawner_service_account() {
    let dep =
        build_spawner_deployment("my-spawner", "default", &spec_with_github(), None, "axon/spawner:v1")
            .unwrap();
    assert_eq!(dep.spec.as_ref().unwrap().replicas, Some(1));
    let pod = dep.spec.unwrap().template.spec.unwrap();
    assert_eq!(pod.service_account_name.as_deref(), Some(SPAWNER_SERVICE_ACCOUNT));
    let args = pod.containers[0].args.as_ref().unwrap();
    assert!(args.contains(&"--github-owner".to_string()));
    assert!(args.contains(&"acme".to_string()));
}

#[test]
fn enterprise_workspace_adds_api_base_url_arg_and_github_token_env() {
    let spec = spec_with_github();
    let ws = axon_core::workspace::WorkspaceSpec {
        repo: "https://github.example.com/acme/widgets.git".to_string(),
        r#ref: None,
        secret_ref: Some("gh-tok".to_string()),
        files: vec![],
    };
    let dep = build_spawner_deployment("s", "default", &spec, Some(&ws), "img").unwrap();
    let pod = dep.spec.unwrap().template.spec.unwrap();
    let args = pod.containers[0].args.as_ref().unwrap();
    assert!(args.contains(&"--github-api-base-url".to_string()));
    assert!(args.contains(&"https://github.example.com/api/v3".to_string()));
    let env = pod.containers[0].env.as_ref().unwrap();
    let token = env.iter().find(|e| e.name == "GITHUB_TOKEN").unwrap();
    let secret_ref = token.value_from.as_ref().unwrap().secret_key_ref.as_ref().unwrap();
    assert_eq!(secret_ref.name, "gh-tok");
}

#[test]
fn github_com_workspace_has_no_api_base_url_arg() {
    let spec = spec_with_github();
    let ws = axon_core::workspace::WorkspaceSpec {
        repo: "https://github.com/acme/widgets.git".to_string(),
        r#ref: None,
        secret_ref: Some("gh-tok".to_string()),
        files: vec![],
    };
    let dep = build_spawner_deployment("s", "default", &spec, Some(&ws), "img").unwrap();
    let pod = dep.spec.unwrap().template.spec.unwrap();
    let args = pod.containers[0].args.as_ref().unwrap();
    assert!(!args.contains(&"--github-api-base-url".to_string()));
}

#[test]
fn invalid_when_is_a_build_error() {
    let mut spec = spec_with_github();
    spec.when.cron = Some(CronSource { schedule: "* * * * *".to_string() });
    let err = build_spawner_deployment("s", "default", &spec, None, "img").unwrap_err();
    assert!(matches!(err, BuildError::InvalidWhen(_)));
}

#[test]
fn no_drift_when_image_args_and_env_match() {
    let spec = spec_with_github();
    let a = build_spawner_deployment("s", "default", &spec, None, "img:v1").unwrap();
    let b = build_spawner_deployment("s", "default", &spec, None, "img:v1").unwrap();
    assert!(!diff_deployment(&a, &b).any());
}

#[test]
fn image_change_is_detected() {
    let spec = spec_with_github();
    let a = build_spawner_deployment("s", "default", &spec, None, "img:v2").unwrap();
    let b = build_spawner_deployment("s", "default", &spec, None, "img:v1").unwrap();
    let drift = diff_deployment(&a, &b);
    assert!(drift.image_changed);
    assert!(drift.any());
}

#[test]
fn args_change_when_owner_repo_changes() {
    let spec_a = spec_with_github();
    let mut spec_b = spec_with_github();
    spec_b.when.github_issues.as_mut().unwrap().repo = "other".to_string();
    let a = build_spawner_deployment("s", "default", &spec_a, None, "img").unwrap();
    let b = build_spawner_deployment("s", "default", &spec_b, None, "img").unwrap();
    assert!(diff_deployment(&a, &b).args_changed);
}

#[test]
fn missing_container_on_either_side_counts_as_full_drift() {
    let spec = spec_with_github();
    let mut a = build_spawner_deployment("s", "default", &spec, None, "img").unwrap();
    a.spec.as_mut().unwrap().template.spec = None;
    let b = build_spawner_deployment("s", "default", &spec, None, "img").unwrap();
    assert!(diff_deployment(&a, &b).any());
}
