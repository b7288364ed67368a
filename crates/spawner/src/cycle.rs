// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One discovery cycle: re-read the TaskSpawner, discover candidate
//! work items, filter and dedup them against the cluster, and create
//! Tasks for the survivors subject to the concurrency cap. This is the
//! Spawner Loop's only unit of work — `main`'s ticker just calls
//! [`run_cycle`] repeatedly.

use axon_core::constants::LABEL_TASKSPAWNER;
use axon_core::{Clock, Task, TaskPhase, TaskSpec, TaskSpawner, TaskSpawnerPhase, TaskSpawnerStatus};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{ListParams, Patch, PatchParams, PostParams};
use kube::Api;
use sha2::{Digest, Sha256};

use crate::source::{Source, WorkItem};
use crate::template::render_prompt;

pub struct CycleContext<C: Clock> {
    pub client: kube::Client,
    pub namespace: String,
    pub spawner_name: String,
    pub clock: C,
}

/// Run one discovery cycle against `source`, whose construction (from
/// `spawner.spec.when`) is the caller's job — building the right
/// `Source` needs CLI-supplied things (the GitHub token, the API base
/// URL) the cycle itself has no business knowing about.
pub async fn run_cycle<C: Clock>(
    ctx: &CycleContext<C>,
    source: &dyn Source,
) -> axon_core::Result<()> {
    let spawners: Api<TaskSpawner> = Api::namespaced(ctx.client.clone(), &ctx.namespace);
    let spawner = spawners.get(&ctx.spawner_name).await.map_err(axon_core::Error::Kube)?;

    let exclude_labels: Vec<String> = spawner
        .spec
        .when
        .github_issues
        .as_ref()
        .map(|g| g.exclude_labels.clone())
        .unwrap_or_default();

    let discovered = source.discover().await.map_err(|e| axon_core::Error::Other(e.to_string()))?;
    let total_discovered = discovered.len() as u64;

    let survivors: Vec<WorkItem> = discovered
        .into_iter()
        .filter(|item| !item.labels.iter().any(|l| exclude_labels.contains(l)))
        .collect();

    let tasks: Api<Task> = Api::namespaced(ctx.client.clone(), &ctx.namespace);
    let active_tasks = count_active_tasks(&tasks, &ctx.spawner_name).await?;

    let max_concurrency = spawner.spec.max_concurrency.filter(|m| *m > 0);
    let mut active_count = active_tasks;
    let mut created_this_cycle = 0u64;

    for item in survivors {
        if let Some(cap) = max_concurrency {
            if active_count + created_this_cycle >= cap as u64 {
                tracing::info!(
                    spawner = %ctx.spawner_name,
                    cap,
                    "max concurrency reached, halting task creation for this cycle"
                );
                break;
            }
        }

        let task_name = deterministic_task_name(&ctx.spawner_name, &item.id);
        if tasks.get_opt(&task_name).await.map_err(axon_core::Error::Kube)?.is_some() {
            continue;
        }

        let prompt = match render_prompt(&spawner.spec.task_template.prompt_template, &item) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(item_id = %item.id, error = %e, "prompt template render failed, skipping item");
                continue;
            }
        };

        let task = build_task_from_template(&task_name, &ctx.spawner_name, &spawner, &prompt);
        match tasks.create(&PostParams::default(), &task).await {
            Ok(_) => {
                created_this_cycle += 1;
                active_count += 1;
            }
            Err(kube::Error::Api(resp)) if resp.code == 409 => {}
            Err(e) => return Err(axon_core::Error::Kube(e)),
        }
    }

    let new_status = TaskSpawnerStatus {
        phase: TaskSpawnerPhase::Running,
        total_discovered: spawner.status.as_ref().map(|s| s.total_discovered).unwrap_or(0)
            + total_discovered,
        total_tasks_created: spawner.status.as_ref().map(|s| s.total_tasks_created).unwrap_or(0)
            + created_this_cycle,
        active_tasks: (active_count) as u32,
        last_discovery_time: Some(ctx.clock.now().to_rfc3339()),
        ..spawner.status.clone().unwrap_or_default()
    };
    write_status(&spawners, &ctx.spawner_name, &new_status).await?;

    Ok(())
}

fn deterministic_task_name(spawner_name: &str, item_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(item_id.as_bytes());
    let digest = hasher.finalize();
    let short = hex_prefix(&digest, 10);
    format!("{spawner_name}-{short}")
}

fn hex_prefix(bytes: &[u8], chars: usize) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect::<String>().chars().take(chars).collect()
}

async fn count_active_tasks(tasks: &Api<Task>, spawner_name: &str) -> axon_core::Result<u64> {
    let lp = ListParams::default().labels(&format!("{LABEL_TASKSPAWNER}={spawner_name}"));
    let list = tasks.list(&lp).await.map_err(axon_core::Error::Kube)?;
    Ok(list
        .items
        .iter()
        .filter(|t| !t.status.as_ref().map(|s| s.phase.is_terminal()).unwrap_or(false))
        .count() as u64)
}

fn build_task_from_template(
    task_name: &str,
    spawner_name: &str,
    spawner: &TaskSpawner,
    prompt: &str,
) -> Task {
    let template = &spawner.spec.task_template;
    let spec = TaskSpec {
        kind: template.kind.unwrap_or(axon_core::task::TaskType::ClaudeCode),
        prompt: prompt.to_string(),
        credentials: template.credentials.clone(),
        model: template.model.clone(),
        image: template.image.clone(),
        workspace_ref: template.workspace_ref.clone(),
        agent_config_ref: template.agent_config_ref.clone(),
        ttl_seconds_after_finished: template.ttl_seconds_after_finished,
        pod_overrides: None,
    };

    let mut labels = std::collections::BTreeMap::new();
    labels.insert(LABEL_TASKSPAWNER.to_string(), spawner_name.to_string());

    Task {
        metadata: ObjectMeta {
            name: Some(task_name.to_string()),
            namespace: spawner.metadata.namespace.clone(),
            labels: Some(labels),
            ..Default::default()
        },
        spec,
        status: None,
    }
}

/// Patches only the discovery counters this loop owns (`phase`,
/// `totalDiscovered`, `totalTasksCreated`, `activeTasks`,
/// `lastDiscoveryTime`) and leaves `deploymentName`/`message` alone —
/// those belong to the TaskSpawner reconciler, which writes
/// concurrently from its own process. Scoping each writer's merge
/// patch to its own fields avoids the lost-update race a full-struct
/// patch would risk.
async fn write_status(
    spawners: &Api<TaskSpawner>,
    name: &str,
    status: &TaskSpawnerStatus,
) -> axon_core::Result<()> {
    let patch = serde_json::json!({
        "status": {
            "phase": status.phase,
            "totalDiscovered": status.total_discovered,
            "totalTasksCreated": status.total_tasks_created,
            "activeTasks": status.active_tasks,
            "lastDiscoveryTime": status.last_discovery_time,
        }
    });
    spawners
        .patch_status(name, &PatchParams::default(), &Patch::Merge(patch))
        .await
        .map_err(axon_core::Error::Kube)?;
    Ok(())
}

#[cfg(test)]
#[path = "cycle_tests.rs"]
mod tests;
