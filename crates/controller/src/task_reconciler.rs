// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task reconciler.
//!
//! Level-triggered: phase is recomputed from the observed Job and Pod
//! on every call, never from the event that triggered it. The only
//! state this reconciler trusts across calls is what's already written
//! to `status` — completion time for the output-capture retry window,
//! and the terminal phase itself (Succeeded/Failed never regress).

use std::sync::Arc;
use std::time::Duration;

use axon_builder::build_task_job;
use axon_core::agentconfig::AgentConfig;
use axon_core::constants::{
    LABEL_TASK, MISSING_REFERENCE_REQUEUE_SECS, OUTPUT_CAPTURE_RETRY_INTERVAL_SECS,
    OUTPUT_CAPTURE_RETRY_WINDOW_SECS, OUTPUT_LOG_TAIL_LINES, TASK_FINALIZER,
};
use axon_core::workspace::Workspace;
use axon_core::{Clock, Error, Task, TaskPhase, TaskStatus};
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Patch, PatchParams, PostParams};
use kube::runtime::controller::Action;
use kube::runtime::finalizer::{finalizer, Event};
use kube::{Api, ResourceExt};

use crate::context::Context;

const REQUEUE_ACTIVE: Duration = Duration::from_secs(15);

#[tracing::instrument(skip(ctx), fields(name = %task.name_any(), namespace = %task.namespace().unwrap_or_default()))]
pub async fn reconcile<C: Clock>(task: Arc<Task>, ctx: Arc<Context<C>>) -> axon_core::Result<Action> {
    ctx.metrics.reconciliations.with_label_values(&["task"]).inc();
    let timer = ctx.metrics.reconcile_duration.with_label_values(&["task"]).start_timer();

    let ns = task.namespace().unwrap_or_default();
    let tasks: Api<Task> = Api::namespaced(ctx.client.clone(), &ns);

    let result = finalizer(&tasks, TASK_FINALIZER, task, |event| async {
        match event {
            Event::Apply(task) => apply(&task, ctx.clone()).await,
            Event::Cleanup(task) => cleanup(&task, ctx.clone()).await,
        }
    })
    .await
    .map_err(|e| Error::Finalizer(e.to_string()));

    timer.observe_duration();
    if result.is_err() {
        ctx.metrics.reconcile_errors.with_label_values(&["task"]).inc();
    }
    result
}

pub fn error_policy<C: Clock>(_task: Arc<Task>, _err: &Error, ctx: Arc<Context<C>>) -> Action {
    ctx.metrics.reconcile_errors.with_label_values(&["task"]).inc();
    Action::requeue(Duration::from_secs(10))
}

async fn apply<C: Clock>(task: &Task, ctx: Arc<Context<C>>) -> axon_core::Result<Action> {
    let name = task.name_any();
    let ns = task.namespace().unwrap_or_default();
    let status = task.status.clone().unwrap_or_default();

    if status.phase.is_terminal() {
        return capture_outputs_and_continue(&ctx, &ns, &name, &task.spec, status).await;
    }

    let workspace = match resolve_ref::<Workspace, C>(&ctx, &ns, task.spec.workspace_ref.as_deref()).await
    {
        Ok(w) => w,
        Err(RefError::Missing) => return Ok(Action::requeue(Duration::from_secs(MISSING_REFERENCE_REQUEUE_SECS))),
        Err(RefError::Other(e)) => return Err(e),
    };
    let agent_config =
        match resolve_ref::<AgentConfig, C>(&ctx, &ns, task.spec.agent_config_ref.as_deref()).await {
            Ok(c) => c,
            Err(RefError::Missing) => {
                return Ok(Action::requeue(Duration::from_secs(MISSING_REFERENCE_REQUEUE_SECS)))
            }
            Err(RefError::Other(e)) => return Err(e),
        };

    let job_result = build_task_job(
        &name,
        &ns,
        &task.spec,
        workspace.as_ref().map(|w| &w.spec),
        agent_config.as_ref().map(|c| &c.spec),
        &ctx.images,
    );

    let mut job = match job_result {
        Ok(job) => job,
        Err(build_err) => {
            write_status(
                &ctx,
                &ns,
                &name,
                TaskStatus {
                    phase: TaskPhase::Failed,
                    message: Some(build_err.to_string()),
                    ..status
                },
            )
            .await?;
            return Ok(Action::await_change());
        }
    };
    job.owner_references_mut().push(task.controller_owner_ref(&()).ok_or_else(|| {
        Error::Other("task is missing uid, cannot set owner reference".to_string())
    })?);

    let jobs: Api<Job> = Api::namespaced(ctx.client.clone(), &ns);
    match jobs.get_opt(&name).await? {
        None => {
            match jobs.create(&PostParams::default(), &job).await {
                Ok(_) => {}
                Err(kube::Error::Api(resp)) if resp.code == 409 => {}
                Err(e) => return Err(Error::Kube(e)),
            }
            let new_status = TaskStatus {
                phase: TaskPhase::Pending,
                job_name: Some(name.clone()),
                start_time: Some(ctx.clock.now().to_rfc3339()),
                ..status
            };
            write_status(&ctx, &ns, &name, new_status).await?;
            return Ok(Action::requeue(REQUEUE_ACTIVE));
        }
        Some(existing) => job = existing,
    }

    let job_status = job.status.clone().unwrap_or_default();
    let pod = find_pod(&ctx, &ns, &name).await?;

    let phase = if job_status.succeeded.unwrap_or(0) > 0 {
        TaskPhase::Succeeded
    } else if job_status.failed.unwrap_or(0) > 0 {
        TaskPhase::Failed
    } else if job_status.active.unwrap_or(0) > 0 {
        TaskPhase::Running
    } else {
        TaskPhase::Pending
    };

    let mut new_status = TaskStatus {
        phase,
        job_name: Some(name.clone()),
        pod_name: pod.as_ref().map(|p| p.name_any()),
        ..status.clone()
    };

    if phase.is_terminal() {
        if new_status.completion_time.is_none() {
            new_status.completion_time = Some(ctx.clock.now().to_rfc3339());
        }
        return capture_outputs_and_continue(&ctx, &ns, &name, &task.spec, new_status).await;
    }

    write_status(&ctx, &ns, &name, new_status).await?;
    Ok(Action::requeue(REQUEUE_ACTIVE))
}

/// Re-attempts output capture on every reconcile of a terminal Task
/// whose `status.outputs` is still empty, for up to
/// `OUTPUT_CAPTURE_RETRY_WINDOW_SECS` after `completionTime` — the Pod's
/// log may not be readable for a few seconds after the Job reports
/// terminal. Called both the first time a Job is observed terminal and
/// on every later reconcile while capture keeps missing, since a
/// terminal phase alone must never short-circuit past this.
async fn capture_outputs_and_continue<C: Clock>(
    ctx: &Context<C>,
    ns: &str,
    name: &str,
    spec: &axon_core::task::TaskSpec,
    mut status: TaskStatus,
) -> axon_core::Result<Action> {
    if status.outputs.is_none() {
        let pod = find_pod(ctx, ns, name).await?;
        if status.pod_name.is_none() {
            status.pod_name = pod.as_ref().map(|p| p.name_any());
        }
        if let Some(pod) = &pod {
            let pods: Api<Pod> = Api::namespaced(ctx.client.clone(), ns);
            let log_params =
                kube::api::LogParams { tail_lines: Some(OUTPUT_LOG_TAIL_LINES), ..Default::default() };
            if let Ok(log) = pods.logs(&pod.name_any(), &log_params).await {
                status.outputs = axon_builder::parse_outputs(&log);
            }
        }

        if status.outputs.is_none() {
            let completed_at = status
                .completion_time
                .as_deref()
                .and_then(|t| chrono::DateTime::parse_from_rfc3339(t).ok())
                .map(|t| t.with_timezone(&chrono::Utc));
            let still_retrying = completed_at
                .map(|at| ctx.clock.now() - at < chrono::Duration::seconds(OUTPUT_CAPTURE_RETRY_WINDOW_SECS))
                .unwrap_or(false);
            write_status(ctx, ns, name, status.clone()).await?;
            if still_retrying {
                // The minimum of competing requeue times wins: don't
                // let a long TTL push out the output-capture retry.
                let retry = Duration::from_secs(OUTPUT_CAPTURE_RETRY_INTERVAL_SECS);
                return match ttl_deadline(ctx, spec, &status) {
                    Some(remaining) if remaining <= chrono::Duration::zero() => {
                        delete_task(ctx, ns, name).await?;
                        Ok(Action::await_change())
                    }
                    Some(remaining) => {
                        let remaining = remaining.to_std().unwrap_or(retry);
                        Ok(Action::requeue(remaining.min(retry)))
                    }
                    None => Ok(Action::requeue(retry)),
                };
            }
            return enforce_ttl(ctx, ns, name, spec, &status).await;
        }

        write_status(ctx, ns, name, status.clone()).await?;
    }

    enforce_ttl(ctx, ns, name, spec, &status).await
}

async fn cleanup<C: Clock>(_task: &Task, _ctx: Arc<Context<C>>) -> axon_core::Result<Action> {
    // The Job carries an owner reference back to this Task, so Kubernetes
    // garbage-collects it (and its Pods) once the finalizer is removed.
    Ok(Action::await_change())
}

/// Remaining time until `completionTime + ttlSecondsAfterFinished`, or
/// `None` if no TTL is set or the Task has no completion time yet. A
/// non-positive result means the deadline has passed.
fn ttl_deadline<C: Clock>(
    ctx: &Context<C>,
    spec: &axon_core::task::TaskSpec,
    status: &TaskStatus,
) -> Option<chrono::Duration> {
    let ttl_secs = spec.ttl_seconds_after_finished?;
    let completed_at = status
        .completion_time
        .as_deref()
        .and_then(|t| chrono::DateTime::parse_from_rfc3339(t).ok())
        .map(|t| t.with_timezone(&chrono::Utc))?;
    let expires_at = completed_at + chrono::Duration::seconds(ttl_secs);
    Some(expires_at - ctx.clock.now())
}

async fn delete_task<C: Clock>(ctx: &Context<C>, ns: &str, name: &str) -> axon_core::Result<()> {
    let tasks: Api<Task> = Api::namespaced(ctx.client.clone(), ns);
    match tasks.delete(name, &kube::api::DeleteParams::default()).await {
        Ok(_) => Ok(()),
        Err(kube::Error::Api(resp)) if resp.code == 404 => Ok(()),
        Err(e) => Err(Error::Kube(e)),
    }
}

/// TTL-after-finished deletion. `ttlSecondsAfterFinished = 0` means
/// "delete immediately on completion"; unset means "never delete
/// automatically." Level-triggered like the rest of the reconciler: it
/// recomputes the remaining duration from `completionTime` on every call
/// rather than trusting a previously scheduled timer.
async fn enforce_ttl<C: Clock>(
    ctx: &Context<C>,
    ns: &str,
    name: &str,
    spec: &axon_core::task::TaskSpec,
    status: &TaskStatus,
) -> axon_core::Result<Action> {
    match ttl_deadline(ctx, spec, status) {
        None => Ok(Action::await_change()),
        Some(remaining) if remaining <= chrono::Duration::zero() => {
            delete_task(ctx, ns, name).await?;
            Ok(Action::await_change())
        }
        Some(remaining) => Ok(Action::requeue(remaining.to_std().unwrap_or(Duration::from_secs(0)))),
    }
}

enum RefError {
    Missing,
    Other(Error),
}

async fn resolve_ref<K, C>(ctx: &Context<C>, ns: &str, name: Option<&str>) -> Result<Option<K>, RefError>
where
    K: kube::Resource<Scope = kube::core::NamespaceResourceScope>
        + Clone
        + std::fmt::Debug
        + for<'de> serde::Deserialize<'de>
        + 'static,
    K::DynamicType: Default,
    C: Clock,
{
    let Some(name) = name else { return Ok(None) };
    let api: Api<K> = Api::namespaced(ctx.client.clone(), ns);
    match api.get(name).await {
        Ok(obj) => Ok(Some(obj)),
        Err(kube::Error::Api(resp)) if resp.code == 404 => Err(RefError::Missing),
        Err(e) => Err(RefError::Other(Error::Kube(e))),
    }
}

async fn find_pod<C: Clock>(ctx: &Context<C>, ns: &str, task_name: &str) -> axon_core::Result<Option<Pod>> {
    let pods: Api<Pod> = Api::namespaced(ctx.client.clone(), ns);
    let lp = kube::api::ListParams::default().labels(&format!("{LABEL_TASK}={task_name}"));
    let list = pods.list(&lp).await?;
    Ok(list.items.into_iter().next())
}

async fn write_status<C: Clock>(
    ctx: &Context<C>,
    ns: &str,
    name: &str,
    status: TaskStatus,
) -> axon_core::Result<()> {
    let tasks: Api<Task> = Api::namespaced(ctx.client.clone(), ns);
    let patch = serde_json::json!({ "status": status });
    tasks.patch_status(name, &PatchParams::default(), &Patch::Merge(patch)).await?;
    Ok(())
}

#[cfg(test)]
#[path = "task_reconciler_tests.rs"]
mod tests;
