// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn names(env: &[EnvVar]) -> Vec<&str> {
    env.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn credential_table_matches_spec() {
    assert_eq!(credential_env_name(TaskType::ClaudeCode, CredentialsType::ApiKey), "ANTHROPIC_API_KEY");
    assert_eq!(credential_env_name(TaskType::ClaudeCode, CredentialsType::Oauth), "CLAUDE_CODE_OAUTH_TOKEN");
    assert_eq!(credential_env_name(TaskType::Codex, CredentialsType::ApiKey), "CODEX_API_KEY");
    assert_eq!(credential_env_name(TaskType::Codex, CredentialsType::Oauth), "CODEX_API_KEY");
    assert_eq!(credential_env_name(TaskType::Gemini, CredentialsType::ApiKey), "GEMINI_API_KEY");
    assert_eq!(credential_env_name(TaskType::Gemini, CredentialsType::Oauth), "GEMINI_API_KEY");
}

#[test]
fn minimal_inputs_only_set_credential() {
    let inputs = EnvInputs {
        task_type: TaskType::ClaudeCode,
        model: None,
        credential_secret_ref: "creds",
        credential_kind: CredentialsType::Oauth,
        workspace_host: None,
        workspace_secret_ref: None,
        agents_md: None,
        has_plugins: false,
        user_env: &[],
    };
    let env = build_env(&inputs);
    assert_eq!(names(&env), vec!["CLAUDE_CODE_OAUTH_TOKEN"]);
}

#[test]
fn enterprise_host_sets_gh_host_and_enterprise_token_not_gh_token() {
    let inputs = EnvInputs {
        task_type: TaskType::ClaudeCode,
        model: None,
        credential_secret_ref: "creds",
        credential_kind: CredentialsType::Oauth,
        workspace_host: Some("github.example.com"),
        workspace_secret_ref: Some("tok"),
        agents_md: None,
        has_plugins: false,
        user_env: &[],
    };
    let env = build_env(&inputs);
    let ns = names(&env);
    assert!(ns.contains(&"GH_HOST"));
    assert!(ns.contains(&"GH_ENTERPRISE_TOKEN"));
    assert!(!ns.contains(&"GH_TOKEN"));
}

#[test]
fn github_com_host_sets_gh_token_not_enterprise_and_no_gh_host() {
    let inputs = EnvInputs {
        task_type: TaskType::ClaudeCode,
        model: None,
        credential_secret_ref: "creds",
        credential_kind: CredentialsType::Oauth,
        workspace_host: Some("github.com"),
        workspace_secret_ref: Some("tok"),
        agents_md: None,
        has_plugins: false,
        user_env: &[],
    };
    let env = build_env(&inputs);
    let ns = names(&env);
    assert!(!ns.contains(&"GH_HOST"));
    assert!(ns.contains(&"GH_TOKEN"));
    assert!(!ns.contains(&"GH_ENTERPRISE_TOKEN"));
}

#[test]
fn user_overrides_do_not_shadow_builtins() {
    let inputs = EnvInputs {
        task_type: TaskType::ClaudeCode,
        model: Some("claude-opus"),
        credential_secret_ref: "creds",
        credential_kind: CredentialsType::Oauth,
        workspace_host: None,
        workspace_secret_ref: None,
        agents_md: None,
        has_plugins: false,
        user_env: &[("AXON_MODEL".to_string(), "sneaky".to_string()), ("FOO".to_string(), "bar".to_string())],
    };
    let env = build_env(&inputs);
    let model = env.iter().find(|e| e.name == "AXON_MODEL").unwrap();
    assert_eq!(model.value.as_deref(), Some("claude-opus"));
    assert!(names(&env).contains(&"FOO"));
}

#[test]
fn full_ordering_matches_spec_sequence() {
    let inputs = EnvInputs {
        task_type: TaskType::Codex,
        model: Some("m"),
        credential_secret_ref: "creds",
        credential_kind: CredentialsType::ApiKey,
        workspace_host: Some("github.example.com"),
        workspace_secret_ref: Some("tok"),
        agents_md: Some("be nice"),
        has_plugins: true,
        user_env: &[("EXTRA".to_string(), "1".to_string())],
    };
    let env = build_env(&inputs);
    assert_eq!(
        names(&env),
        vec![
            "AXON_MODEL",
            "CODEX_API_KEY",
            "GH_HOST",
            "GITHUB_TOKEN",
            "GH_ENTERPRISE_TOKEN",
            "AXON_AGENTS_MD",
            "AXON_PLUGIN_DIR",
            "EXTRA",
        ]
    );
}
