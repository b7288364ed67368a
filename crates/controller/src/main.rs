// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manager binary: wires the Task and TaskSpawner controllers onto the
//! cluster, behind an optional leader election gate.

use std::net::SocketAddr;
use std::sync::Arc;

use axon_builder::ImageDefaults;
use axon_controller::context::Context;
use axon_controller::metrics::Metrics;
use axon_controller::{health, leader, task_reconciler, taskspawner_reconciler};
use axon_core::{SystemClock, Task, TaskSpawner};
use clap::Parser;
use futures::StreamExt;
use kube::runtime::watcher;
use kube::runtime::Controller;
use kube::Api;

#[derive(Parser, Debug)]
#[command(name = "axon-controller", version, about = "Task and TaskSpawner reconcilers")]
struct Cli {
    /// Namespace to watch; unset watches all namespaces the service account can see.
    #[arg(long, env = "AXON_NAMESPACE")]
    namespace: Option<String>,

    #[arg(long, env = "AXON_METRICS_BIND_ADDRESS", default_value = "0.0.0.0:8080")]
    metrics_bind_address: SocketAddr,

    #[arg(long, env = "AXON_HEALTH_PROBE_BIND_ADDRESS", default_value = "0.0.0.0:8081")]
    health_probe_bind_address: SocketAddr,

    #[arg(long, env = "AXON_LEADER_ELECT", default_value_t = false)]
    leader_elect: bool,

    #[arg(long, env = "AXON_LEASE_NAMESPACE", default_value = "axon-system")]
    lease_namespace: String,

    #[arg(long, env = "AXON_LEASE_NAME", default_value = "axon-controller")]
    lease_name: String,

    #[arg(long, env = "AXON_CLAUDE_CODE_IMAGE", default_value = "ghcr.io/axon/claude-code-agent:latest")]
    claude_code_image: String,

    #[arg(long, env = "AXON_CLAUDE_CODE_IMAGE_PULL_POLICY")]
    claude_code_image_pull_policy: Option<String>,

    #[arg(long, env = "AXON_CODEX_IMAGE", default_value = "ghcr.io/axon/codex-agent:latest")]
    codex_image: String,

    #[arg(long, env = "AXON_GEMINI_IMAGE", default_value = "ghcr.io/axon/gemini-agent:latest")]
    gemini_image: String,

    #[arg(long, env = "AXON_SPAWNER_IMAGE", default_value = "ghcr.io/axon/spawner:latest")]
    spawner_image: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();
    let client = kube::Client::try_default().await?;

    if cli.leader_elect {
        let identity = std::env::var("HOSTNAME").unwrap_or_else(|_| uuid::Uuid::new_v4().to_string());
        leader::acquire(client.clone(), &cli.lease_namespace, &cli.lease_name, &identity).await;
    }

    let metrics = Arc::new(Metrics::new());
    let metrics_bind_address = cli.metrics_bind_address;
    let metrics_for_server = metrics.clone();
    tokio::spawn(async move {
        if let Err(e) = health::serve_metrics(metrics_bind_address, metrics_for_server).await {
            tracing::error!(error = %e, "metrics server exited");
        }
    });
    let health_probe_bind_address = cli.health_probe_bind_address;
    tokio::spawn(async move {
        if let Err(e) = health::serve_health(health_probe_bind_address).await {
            tracing::error!(error = %e, "health probe server exited");
        }
    });

    let context = Arc::new(Context {
        client: client.clone(),
        images: ImageDefaults {
            claude_code: cli.claude_code_image,
            claude_code_pull_policy: cli.claude_code_image_pull_policy,
            codex: cli.codex_image,
            gemini: cli.gemini_image,
        },
        spawner_image: cli.spawner_image,
        clock: SystemClock,
        metrics: (*metrics).clone(),
    });

    let tasks_api: Api<Task> = match &cli.namespace {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::all(client.clone()),
    };
    let spawners_api: Api<TaskSpawner> = match &cli.namespace {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::all(client.clone()),
    };

    let task_controller = Controller::new(tasks_api, watcher::Config::default())
        .shutdown_on_signal()
        .run(task_reconciler::reconcile, task_reconciler::error_policy, context.clone())
        .for_each(|res| async move {
            match res {
                Ok(o) => tracing::debug!(?o, "task reconciled"),
                Err(e) => tracing::warn!(error = %e, "task reconcile failed"),
            }
        });

    let spawner_controller = Controller::new(spawners_api, watcher::Config::default())
        .shutdown_on_signal()
        .run(taskspawner_reconciler::reconcile, taskspawner_reconciler::error_policy, context)
        .for_each(|res| async move {
            match res {
                Ok(o) => tracing::debug!(?o, "taskspawner reconciled"),
                Err(e) => tracing::warn!(error = %e, "taskspawner reconcile failed"),
            }
        });

    tracing::info!("axon-controller started");
    tokio::join!(task_controller, spawner_controller);
    Ok(())
}
