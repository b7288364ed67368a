// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TaskSpawner reconciler: resolves `spec.taskTemplate`'s referents the
//! same way the Task reconciler does, builds the desired Spawner Loop
//! Deployment, and creates it or patches it in place on drift. The
//! Spawner Loop itself (discovery, rendering, Task creation) is owned
//! by the running Deployment's container, not by this reconciler.

use std::sync::Arc;
use std::time::Duration;

use axon_builder::{
    build_spawner_deployment, build_spawner_role_binding, build_spawner_service_account,
    diff_deployment,
};
use axon_core::constants::{MISSING_REFERENCE_REQUEUE_SECS, TASKSPAWNER_FINALIZER};
use axon_core::{Clock, Error, TaskSpawner, TaskSpawnerPhase, TaskSpawnerStatus};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::ServiceAccount;
use k8s_openapi::api::rbac::v1::RoleBinding;
use kube::api::{Patch, PatchParams, PostParams};
use kube::runtime::controller::Action;
use kube::runtime::finalizer::{finalizer, Event};
use kube::{Api, ResourceExt};

use crate::context::Context;

const REQUEUE_STEADY: Duration = Duration::from_secs(30);

#[tracing::instrument(skip(ctx), fields(name = %spawner.name_any(), namespace = %spawner.namespace().unwrap_or_default()))]
pub async fn reconcile<C: Clock>(
    spawner: Arc<TaskSpawner>,
    ctx: Arc<Context<C>>,
) -> axon_core::Result<Action> {
    ctx.metrics.reconciliations.with_label_values(&["taskspawner"]).inc();
    let timer = ctx.metrics.reconcile_duration.with_label_values(&["taskspawner"]).start_timer();

    let ns = spawner.namespace().unwrap_or_default();
    let spawners: Api<TaskSpawner> = Api::namespaced(ctx.client.clone(), &ns);

    let result = finalizer(&spawners, TASKSPAWNER_FINALIZER, spawner, |event| async {
        match event {
            Event::Apply(spawner) => apply(&spawner, ctx.clone()).await,
            Event::Cleanup(spawner) => cleanup(&spawner, ctx.clone()).await,
        }
    })
    .await
    .map_err(|e| Error::Finalizer(e.to_string()));

    timer.observe_duration();
    if result.is_err() {
        ctx.metrics.reconcile_errors.with_label_values(&["taskspawner"]).inc();
    }
    result
}

pub fn error_policy<C: Clock>(_spawner: Arc<TaskSpawner>, _err: &Error, ctx: Arc<Context<C>>) -> Action {
    ctx.metrics.reconcile_errors.with_label_values(&["taskspawner"]).inc();
    Action::requeue(Duration::from_secs(10))
}

async fn apply<C: Clock>(spawner: &TaskSpawner, ctx: Arc<Context<C>>) -> axon_core::Result<Action> {
    let name = spawner.name_any();
    let ns = spawner.namespace().unwrap_or_default();
    let status = spawner.status.clone().unwrap_or_default();

    let workspace = match ensure_referents_exist(&ctx, &ns, spawner).await? {
        Ok(workspace) => workspace,
        Err(()) => return Ok(Action::requeue(Duration::from_secs(MISSING_REFERENCE_REQUEUE_SECS))),
    };

    ensure_rbac(&ctx, &ns).await?;

    let mut desired = match build_spawner_deployment(
        &name,
        &ns,
        &spawner.spec,
        workspace.as_ref().map(|w| &w.spec),
        &ctx.spawner_image,
    ) {
        Ok(d) => d,
        Err(build_err) => {
            write_status(
                &ctx,
                &ns,
                &name,
                TaskSpawnerStatus {
                    phase: TaskSpawnerPhase::Failed,
                    message: Some(build_err.to_string()),
                    ..status
                },
            )
            .await?;
            return Ok(Action::await_change());
        }
    };

    desired
        .owner_references_mut()
        .push(spawner.controller_owner_ref(&()).ok_or_else(|| {
            Error::Other("taskspawner is missing uid, cannot set owner reference".to_string())
        })?);

    let deployments: Api<Deployment> = Api::namespaced(ctx.client.clone(), &ns);
    match deployments.get_opt(&name).await? {
        None => {
            match deployments.create(&PostParams::default(), &desired).await {
                Ok(_) => {}
                Err(kube::Error::Api(resp)) if resp.code == 409 => {}
                Err(e) => return Err(Error::Kube(e)),
            }
        }
        Some(observed) => {
            let drift = diff_deployment(&desired, &observed);
            if drift.any() {
                deployments
                    .replace(&name, &PostParams::default(), &desired)
                    .await?;
            }
        }
    }

    let new_status = TaskSpawnerStatus {
        phase: TaskSpawnerPhase::Pending,
        deployment_name: Some(name.clone()),
        ..status
    };
    write_status(&ctx, &ns, &name, new_status).await?;
    Ok(Action::requeue(REQUEUE_STEADY))
}

async fn cleanup<C: Clock>(_spawner: &TaskSpawner, _ctx: Arc<Context<C>>) -> axon_core::Result<Action> {
    // The Deployment carries an owner reference back to this TaskSpawner,
    // so it is garbage-collected once the finalizer is removed.
    Ok(Action::await_change())
}

/// Idempotently creates the shared spawner `ServiceAccount` and
/// `RoleBinding` in `ns`. Swallows `AlreadyExists` the same way Job
/// creation does in the Task reconciler — these objects are shared
/// across every spawner in the namespace and are never patched once
/// created.
async fn ensure_rbac<C: Clock>(ctx: &Context<C>, ns: &str) -> axon_core::Result<()> {
    let service_accounts: Api<ServiceAccount> = Api::namespaced(ctx.client.clone(), ns);
    match service_accounts.create(&PostParams::default(), &build_spawner_service_account(ns)).await
    {
        Ok(_) => {}
        Err(kube::Error::Api(resp)) if resp.code == 409 => {}
        Err(e) => return Err(Error::Kube(e)),
    }

    let role_bindings: Api<RoleBinding> = Api::namespaced(ctx.client.clone(), ns);
    match role_bindings.create(&PostParams::default(), &build_spawner_role_binding(ns)).await {
        Ok(_) => Ok(()),
        Err(kube::Error::Api(resp)) if resp.code == 409 => Ok(()),
        Err(e) => Err(Error::Kube(e)),
    }
}

/// Checks that `spec.taskTemplate`'s `workspaceRef`/`agentConfigRef`, if
/// set, resolve to an existing object, returning the resolved Workspace
/// (the builder needs its repo host/secretRef for `--github-api-base-url`
/// and the spawner's `GITHUB_TOKEN` env var). Returns `Ok(Err(()))`
/// rather than bubbling a not-found error so the caller can distinguish
/// "keep retrying on a short timer" from a real API failure.
async fn ensure_referents_exist<C: Clock>(
    ctx: &Context<C>,
    ns: &str,
    spawner: &TaskSpawner,
) -> axon_core::Result<Result<Option<axon_core::workspace::Workspace>, ()>> {
    let mut workspace = None;
    if let Some(name) = &spawner.spec.task_template.workspace_ref {
        let api: Api<axon_core::workspace::Workspace> = Api::namespaced(ctx.client.clone(), ns);
        match api.get(name).await {
            Ok(ws) => workspace = Some(ws),
            Err(kube::Error::Api(resp)) if resp.code == 404 => return Ok(Err(())),
            Err(e) => return Err(Error::Kube(e)),
        }
    }
    if let Some(name) = &spawner.spec.task_template.agent_config_ref {
        let api: Api<axon_core::agentconfig::AgentConfig> = Api::namespaced(ctx.client.clone(), ns);
        match api.get(name).await {
            Ok(_) => {}
            Err(kube::Error::Api(resp)) if resp.code == 404 => return Ok(Err(())),
            Err(e) => return Err(Error::Kube(e)),
        }
    }
    Ok(Ok(workspace))
}

/// Patches only the fields this reconciler owns (`phase`,
/// `deploymentName`, `message`) and leaves `totalDiscovered`/
/// `totalTasksCreated`/`activeTasks`/`lastDiscoveryTime` untouched —
/// those are the running Spawner Loop's counters, written concurrently
/// by `axon-spawner`'s own cycle loop. A merge patch carrying the full
/// status struct here would silently clobber whichever counter update
/// lost the race.
async fn write_status<C: Clock>(
    ctx: &Context<C>,
    ns: &str,
    name: &str,
    status: TaskSpawnerStatus,
) -> axon_core::Result<()> {
    let spawners: Api<TaskSpawner> = Api::namespaced(ctx.client.clone(), ns);
    let patch = serde_json::json!({
        "status": {
            "phase": status.phase,
            "deploymentName": status.deployment_name,
            "message": status.message,
        }
    });
    spawners.patch_status(name, &PatchParams::default(), &Patch::Merge(patch)).await?;
    Ok(())
}
