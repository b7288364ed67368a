// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task → Job. The Workload Builder's main entry point: pure and
//! deterministic, so a drift comparator or a unit test can call it
//! without a cluster.

use crate::env::{build_env, EnvInputs};
use crate::repo_url::parse_repo_url;
use crate::sanitize::{sanitize_name, sanitize_relative_path};
use axon_core::agentconfig::AgentConfigSpec;
use axon_core::constants::{
    child_labels, AGENT_UID, ENTRYPOINT_PATH, LABEL_COMPONENT_TASK, LABEL_TASK, PLUGIN_PATH,
    WORKSPACE_PATH, WORKSPACE_REPO_SUBDIR,
};
use axon_core::error::BuildError;
use axon_core::task::TaskSpec;
use axon_core::workspace::WorkspaceSpec;
use base64::Engine;
use k8s_openapi::api::batch::v1::{Job, JobSpec};
use k8s_openapi::api::core::v1::{
    Container, EmptyDirVolumeSource, PodSecurityContext, PodSpec, PodTemplateSpec, ResourceRequirements,
    Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// Per-agent-type default container images. Overridable by
/// `--<type>-image` controller flags and, per-Task, by `spec.image`.
#[derive(Debug, Clone)]
pub struct ImageDefaults {
    pub claude_code: String,
    pub codex: String,
    pub gemini: String,
    /// `--claude-code-image-pull-policy`; unset leaves the field unset on
    /// the container so the cluster default (`IfNotPresent` for tagged
    /// images, `Always` for `:latest`) applies.
    pub claude_code_pull_policy: Option<String>,
}

impl ImageDefaults {
    pub fn for_type(&self, kind: axon_core::task::TaskType) -> &str {
        use axon_core::task::TaskType::*;
        match kind {
            ClaudeCode => &self.claude_code,
            Codex => &self.codex,
            Gemini => &self.gemini,
        }
    }

    fn pull_policy_for_type(&self, kind: axon_core::task::TaskType) -> Option<&str> {
        match kind {
            axon_core::task::TaskType::ClaudeCode => self.claude_code_pull_policy.as_deref(),
            _ => None,
        }
    }
}

/// Build the desired Job for a Task.
///
/// `workspace` and `agent_config` are the resolved referent specs, or
/// `None` if the Task does not reference one. `task_name` is the Task's
/// metadata name (used for labels and the Job name) and `namespace` is
/// its namespace.
pub fn build_task_job(
    task_name: &str,
    namespace: &str,
    task: &TaskSpec,
    workspace: Option<&WorkspaceSpec>,
    agent_config: Option<&AgentConfigSpec>,
    images: &ImageDefaults,
) -> Result<Job, BuildError> {
    let mut labels = child_labels(LABEL_COMPONENT_TASK);
    labels.insert(LABEL_TASK.to_string(), task_name.to_string());

    let mut volumes = Vec::new();
    let mut init_containers = Vec::new();
    let mut main_mounts = Vec::new();
    let mut working_dir = None;
    let mut fs_group = None;

    let repo_host = workspace.map(|w| parse_repo_url(&w.repo).host);

    if let Some(ws) = workspace {
        fs_group = Some(AGENT_UID);
        volumes.push(Volume {
            name: "workspace".to_string(),
            empty_dir: Some(EmptyDirVolumeSource::default()),
            ..Default::default()
        });
        let mount = VolumeMount {
            name: "workspace".to_string(),
            mount_path: WORKSPACE_PATH.to_string(),
            ..Default::default()
        };
        main_mounts.push(mount.clone());

        init_containers.push(build_git_clone_init_container(ws, &mount)?);

        if !ws.files.is_empty() {
            init_containers.push(build_workspace_files_init_container(ws, &mount)?);
        }

        working_dir = Some(format!("{WORKSPACE_PATH}/{WORKSPACE_REPO_SUBDIR}"));
    }

    let config_with_plugins = agent_config.filter(|c| !c.plugins.is_empty());
    let has_plugins = config_with_plugins.is_some();
    if let Some(config) = config_with_plugins {
        volumes.push(Volume {
            name: "plugin".to_string(),
            empty_dir: Some(EmptyDirVolumeSource::default()),
            ..Default::default()
        });
        let mount =
            VolumeMount { name: "plugin".to_string(), mount_path: PLUGIN_PATH.to_string(), ..Default::default() };
        main_mounts.push(mount.clone());
        init_containers.push(build_plugin_setup_init_container(config, &mount)?);
    }

    let image = task.image.clone().unwrap_or_else(|| images.for_type(task.kind).to_string());

    let user_env: Vec<(String, String)> = task
        .pod_overrides
        .as_ref()
        .map(|o| o.env.iter().map(|e| (e.name.clone(), e.value.clone())).collect())
        .unwrap_or_default();

    let env_inputs = EnvInputs {
        task_type: task.kind,
        model: task.model.as_deref(),
        credential_secret_ref: &task.credentials.secret_ref,
        credential_kind: task.credentials.kind,
        workspace_host: repo_host.as_deref(),
        workspace_secret_ref: workspace.and_then(|w| w.secret_ref.as_deref()),
        agents_md: agent_config.map(|c| c.agents_md.as_str()),
        has_plugins,
        user_env: &user_env,
    };
    let env = build_env(&env_inputs);

    let resources = build_resource_requirements(task);

    let main_container = Container {
        name: task.kind.as_str().to_string(),
        image: Some(image),
        image_pull_policy: images.pull_policy_for_type(task.kind).map(str::to_string),
        command: Some(vec![ENTRYPOINT_PATH.to_string()]),
        args: Some(vec![task.prompt.clone()]),
        working_dir,
        env: Some(env),
        volume_mounts: if main_mounts.is_empty() { None } else { Some(main_mounts) },
        resources,
        ..Default::default()
    };

    let active_deadline_seconds =
        task.pod_overrides.as_ref().and_then(|o| o.active_deadline_seconds);
    let node_selector = task
        .pod_overrides
        .as_ref()
        .filter(|o| !o.node_selector.is_empty())
        .map(|o| o.node_selector.clone());

    let pod_spec = PodSpec {
        init_containers: if init_containers.is_empty() { None } else { Some(init_containers) },
        containers: vec![main_container],
        volumes: if volumes.is_empty() { None } else { Some(volumes) },
        restart_policy: Some("Never".to_string()),
        active_deadline_seconds,
        node_selector,
        security_context: fs_group.map(|g| PodSecurityContext { fs_group: Some(g), ..Default::default() }),
        ..Default::default()
    };

    Ok(Job {
        metadata: ObjectMeta {
            name: Some(task_name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec: Some(JobSpec {
            backoff_limit: Some(0),
            // Deliberately not mirrored into the Job's own
            // ttlSecondsAfterFinished: that would let Kubernetes' builtin
            // TTL controller delete the Job (and its Pod logs) out from
            // under the output-capture retry window. TTL is enforced at
            // the Task level instead — see task_reconciler::enforce_ttl.
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta { labels: Some(labels), ..Default::default() }),
                spec: Some(pod_spec),
            },
            ..Default::default()
        }),
        status: None,
    })
}

fn build_resource_requirements(task: &TaskSpec) -> Option<ResourceRequirements> {
    let overrides = task.pod_overrides.as_ref()?;
    let mut requests = BTreeMap::new();
    let mut limits = BTreeMap::new();
    if let Some(v) = &overrides.cpu_request {
        requests.insert("cpu".to_string(), Quantity(v.clone()));
    }
    if let Some(v) = &overrides.memory_request {
        requests.insert("memory".to_string(), Quantity(v.clone()));
    }
    if let Some(v) = &overrides.cpu_limit {
        limits.insert("cpu".to_string(), Quantity(v.clone()));
    }
    if let Some(v) = &overrides.memory_limit {
        limits.insert("memory".to_string(), Quantity(v.clone()));
    }
    if requests.is_empty() && limits.is_empty() {
        return None;
    }
    Some(ResourceRequirements {
        requests: if requests.is_empty() { None } else { Some(requests) },
        limits: if limits.is_empty() { None } else { Some(limits) },
        claims: None,
    })
}

fn build_git_clone_init_container(
    ws: &WorkspaceSpec,
    mount: &VolumeMount,
) -> Result<Container, BuildError> {
    let dest = format!("{WORKSPACE_PATH}/{WORKSPACE_REPO_SUBDIR}");

    let mut clone_args = vec!["clone".to_string()];
    if let Some(r) = &ws.r#ref {
        clone_args.push("--branch".to_string());
        clone_args.push(r.clone());
    }
    clone_args.push("--no-single-branch".to_string());
    clone_args.push("--depth".to_string());
    clone_args.push("1".to_string());
    clone_args.push("--".to_string());
    clone_args.push(ws.repo.clone());
    clone_args.push(dest.clone());

    if ws.secret_ref.is_some() {
        let clone_cmd = format!("git {}", shell_join(&clone_args));
        let script = format!(
            "set -e\n\
             helper='!f() {{ echo username=x-access-token; echo password=\"$GITHUB_TOKEN\"; }}; f'\n\
             git config --global credential.helper \"$helper\"\n\
             {clone_cmd}\n\
             cd {dest}\n\
             git config credential.helper \"$helper\"\n"
        );
        Ok(Container {
            name: "git-clone".to_string(),
            command: Some(vec!["sh".to_string(), "-c".to_string(), script]),
            volume_mounts: Some(vec![mount.clone()]),
            ..Default::default()
        })
    } else {
        Ok(Container {
            name: "git-clone".to_string(),
            command: Some(vec!["git".to_string()]),
            args: Some(clone_args),
            volume_mounts: Some(vec![mount.clone()]),
            ..Default::default()
        })
    }
}

fn shell_join(args: &[String]) -> String {
    args.iter().map(|a| format!("'{}'", a.replace('\'', "'\\''"))).collect::<Vec<_>>().join(" ")
}

fn build_workspace_files_init_container(
    ws: &WorkspaceSpec,
    mount: &VolumeMount,
) -> Result<Container, BuildError> {
    let dest_root = format!("{WORKSPACE_PATH}/{WORKSPACE_REPO_SUBDIR}");
    let mut script = String::from("set -e\n");
    for file in &ws.files {
        let safe = sanitize_relative_path(&file.path)?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(file.content.as_bytes());
        let full_path = format!("{dest_root}/{safe}");
        let parent = std::path::Path::new(&full_path)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| dest_root.clone());
        script.push_str(&format!(
            "mkdir -p '{parent}'\necho '{encoded}' | base64 -d > '{full_path}'\n"
        ));
    }
    Ok(Container {
        name: "workspace-files".to_string(),
        command: Some(vec!["sh".to_string(), "-c".to_string(), script]),
        volume_mounts: Some(vec![mount.clone()]),
        ..Default::default()
    })
}

fn build_plugin_setup_init_container(
    config: &AgentConfigSpec,
    mount: &VolumeMount,
) -> Result<Container, BuildError> {
    let mut script = String::from("set -e\n");
    for plugin in &config.plugins {
        let plugin_name = sanitize_name(&plugin.name)?;
        for skill in &plugin.skills {
            let skill_name = sanitize_name(&skill.name)?;
            let dir = format!("{PLUGIN_PATH}/{plugin_name}/skills/{skill_name}");
            let encoded = base64::engine::general_purpose::STANDARD.encode(skill.body.as_bytes());
            script.push_str(&format!(
                "mkdir -p '{dir}'\necho '{encoded}' | base64 -d > '{dir}/SKILL.md'\n"
            ));
        }
        for agent in &plugin.agents {
            let agent_name = sanitize_name(&agent.name)?;
            let dir = format!("{PLUGIN_PATH}/{plugin_name}/agents");
            let encoded = base64::engine::general_purpose::STANDARD.encode(agent.body.as_bytes());
            script.push_str(&format!(
                "mkdir -p '{dir}'\necho '{encoded}' | base64 -d > '{dir}/{agent_name}.md'\n"
            ));
        }
    }
    Ok(Container {
        name: "plugin-setup".to_string(),
        command: Some(vec!["sh".to_string(), "-c".to_string(), script]),
        volume_mounts: Some(vec![mount.clone()]),
        ..Default::default()
    })
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
