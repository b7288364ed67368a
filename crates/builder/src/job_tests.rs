// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use axon_core::agentconfig::{NamedBody, Plugin};
use axon_core::task::TaskType;
use axon_core::test_support::{task_spec, workspace_spec};

fn images() -> ImageDefaults {
    ImageDefaults {
        claude_code: "axon/claude-code:latest".to_string(),
        codex: "axon/codex:latest".to_string(),
        gemini: "axon/gemini:latest".to_string(),
        claude_code_pull_policy: None,
    }
}

#[test]
fn minimal_task_has_one_main_container_and_no_volumes() {
    let task = task_spec(TaskType::ClaudeCode, "do the thing");
    let job = build_task_job("t1", "default", &task, None, None, &images()).unwrap();
    let spec = job.spec.unwrap();
    assert_eq!(spec.backoff_limit, Some(0));
    let pod = spec.template.spec.unwrap();
    assert_eq!(pod.restart_policy.as_deref(), Some("Never"));
    assert!(pod.init_containers.is_none());
    assert!(pod.volumes.is_none());
    assert_eq!(pod.containers.len(), 1);
    let main = &pod.containers[0];
    assert_eq!(main.command.as_deref(), Some(["/axon_entrypoint.sh".to_string()].as_slice()));
    assert_eq!(main.args.as_deref(), Some(["do the thing".to_string()].as_slice()));
}

#[test]
fn workspace_adds_exactly_one_clone_container_one_volume_and_fsgroup() {
    let task = task_spec(TaskType::ClaudeCode, "p");
    let ws = workspace_spec("https://github.com/o/r.git");
    let job = build_task_job("t1", "default", &task, Some(&ws), None, &images()).unwrap();
    let pod = job.spec.unwrap().template.spec.unwrap();
    let inits = pod.init_containers.unwrap();
    assert_eq!(inits.len(), 1);
    assert_eq!(inits[0].name, "git-clone");
    let volumes = pod.volumes.unwrap();
    assert_eq!(volumes.iter().filter(|v| v.name == "workspace").count(), 1);
    assert_eq!(pod.security_context.unwrap().fs_group, Some(AGENT_UID));
}

#[test]
fn enterprise_workspace_with_token_sets_gh_host_and_enterprise_token() {
    let task = task_spec(TaskType::ClaudeCode, "p");
    let mut ws = workspace_spec("https://github.example.com/o/r.git");
    ws.secret_ref = Some("tok".to_string());
    let job = build_task_job("t1", "default", &task, Some(&ws), None, &images()).unwrap();
    let pod = job.spec.unwrap().template.spec.unwrap();
    let env = pod.containers[0].env.as_ref().unwrap();
    let names: Vec<_> = env.iter().map(|e| e.name.as_str()).collect();
    assert!(names.contains(&"GH_HOST"));
    assert!(names.contains(&"GH_ENTERPRISE_TOKEN"));
    assert!(!names.contains(&"GH_TOKEN"));
    let clone = &pod.init_containers.unwrap()[0];
    assert_eq!(clone.command.as_deref().unwrap()[0], "sh");
    assert!(clone.command.as_ref().unwrap()[2].contains("credential.helper"));
}

#[test]
fn workspace_files_are_sanitized_and_rejected_on_traversal() {
    let task = task_spec(TaskType::ClaudeCode, "p");
    let mut ws = workspace_spec("https://github.com/o/r.git");
    ws.files.push(axon_core::workspace::WorkspaceFile {
        path: "../escape".to_string(),
        content: "x".to_string(),
    });
    let err = build_task_job("t1", "default", &task, Some(&ws), None, &images()).unwrap_err();
    assert!(matches!(err, BuildError::UnsanitizablePath(_)));
}

#[test]
fn plugin_config_adds_plugin_volume_and_setup_container() {
    let task = task_spec(TaskType::ClaudeCode, "p");
    let config = AgentConfigSpec {
        agents_md: "be terse".to_string(),
        plugins: vec![Plugin {
            name: "reviewer".to_string(),
            skills: vec![NamedBody { name: "lint".to_string(), body: "lint skill".to_string() }],
            agents: vec![NamedBody { name: "critic".to_string(), body: "critic agent".to_string() }],
        }],
    };
    let job = build_task_job("t1", "default", &task, None, Some(&config), &images()).unwrap();
    let pod = job.spec.unwrap().template.spec.unwrap();
    let inits = pod.init_containers.unwrap();
    assert_eq!(inits.len(), 1);
    assert_eq!(inits[0].name, "plugin-setup");
    let volumes = pod.volumes.unwrap();
    assert!(volumes.iter().any(|v| v.name == "plugin"));
    let env = pod.containers[0].env.as_ref().unwrap();
    assert!(env.iter().any(|e| e.name == "AXON_PLUGIN_DIR"));
    assert!(env.iter().any(|e| e.name == "AXON_AGENTS_MD"));
}

#[test]
fn invalid_plugin_name_is_a_build_error() {
    let task = task_spec(TaskType::ClaudeCode, "p");
    let config = AgentConfigSpec {
        agents_md: String::new(),
        plugins: vec![Plugin { name: "..".to_string(), skills: vec![], agents: vec![] }],
    };
    let err = build_task_job("t1", "default", &task, None, Some(&config), &images()).unwrap_err();
    assert!(matches!(err, BuildError::UnsanitizableName(_)));
}

#[test]
fn image_override_wins_over_type_default() {
    let mut task = task_spec(TaskType::Gemini, "p");
    task.image = Some("custom/image:tag".to_string());
    let job = build_task_job("t1", "default", &task, None, None, &images()).unwrap();
    let pod = job.spec.unwrap().template.spec.unwrap();
    assert_eq!(pod.containers[0].image.as_deref(), Some("custom/image:tag"));
}

#[test]
fn labels_present_on_job_and_pod_template() {
    let task = task_spec(TaskType::ClaudeCode, "p");
    let job = build_task_job("my-task", "ns", &task, None, None, &images()).unwrap();
    let job_labels = job.metadata.labels.unwrap();
    assert_eq!(job_labels.get("axon.io/task").map(String::as_str), Some("my-task"));
    assert_eq!(job_labels.get("app.kubernetes.io/name").map(String::as_str), Some("axon"));
    let pod_labels = job.spec.unwrap().template.metadata.unwrap().labels.unwrap();
    assert_eq!(pod_labels.get("axon.io/task").map(String::as_str), Some("my-task"));
}

#[test]
fn ttl_seconds_after_finished_is_not_mirrored_onto_the_job() {
    // TTL is enforced by the Task reconciler deleting the Task, not by
    // Kubernetes' builtin Job TTL controller racing output capture.
    let mut task = task_spec(TaskType::ClaudeCode, "p");
    task.ttl_seconds_after_finished = Some(3600);
    let job = build_task_job("t1", "default", &task, None, None, &images()).unwrap();
    assert_eq!(job.spec.unwrap().ttl_seconds_after_finished, None);
}

#[test]
fn claude_code_pull_policy_only_applies_to_claude_code_containers() {
    let mut with_policy = images();
    with_policy.claude_code_pull_policy = Some("Always".to_string());

    let claude = task_spec(TaskType::ClaudeCode, "p");
    let job = build_task_job("t1", "default", &claude, None, None, &with_policy).unwrap();
    let pod = job.spec.unwrap().template.spec.unwrap();
    assert_eq!(pod.containers[0].image_pull_policy.as_deref(), Some("Always"));

    let codex = task_spec(TaskType::Codex, "p");
    let job = build_task_job("t1", "default", &codex, None, None, &with_policy).unwrap();
    let pod = job.spec.unwrap().template.spec.unwrap();
    assert_eq!(pod.containers[0].image_pull_policy, None);
}

#[test]
fn active_deadline_seconds_from_pod_overrides() {
    let mut task = task_spec(TaskType::ClaudeCode, "p");
    task.pod_overrides = Some(axon_core::task::PodOverrides {
        active_deadline_seconds: Some(600),
        ..Default::default()
    });
    let job = build_task_job("t1", "default", &task, None, None, &images()).unwrap();
    let pod = job.spec.unwrap().template.spec.unwrap();
    assert_eq!(pod.active_deadline_seconds, Some(600));
}
