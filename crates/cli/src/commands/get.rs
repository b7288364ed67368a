// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `axon get`: tabulates Tasks or TaskSpawners. Read-only, no
//! reconciliation semantics — just lists the custom resource and
//! prints a subset of `status` as columns, the same shape `kubectl get`
//! would show via printcolumns.

use anyhow::{Context as _, Result};
use axon_core::{Task, TaskSpawner};
use clap::{Args, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Table};
use kube::{api::ListParams, Api, ResourceExt};

#[derive(Clone, Copy, ValueEnum)]
pub enum Kind {
    Task,
    Taskspawner,
}

#[derive(Args)]
pub struct GetArgs {
    /// Kind of object to list.
    pub kind: Kind,
    /// Print only this named object instead of every object in the namespace.
    pub name: Option<String>,
    #[arg(short, long, default_value = "default")]
    pub namespace: String,
}

pub async fn get(args: GetArgs) -> Result<()> {
    let client = kube::Client::try_default().await.context("connecting to cluster")?;

    match args.kind {
        Kind::Task => {
            let api: Api<Task> = Api::namespaced(client, &args.namespace);
            let tasks = list_or_get(&api, args.name.as_deref()).await?;
            print_tasks(&tasks);
        }
        Kind::Taskspawner => {
            let api: Api<TaskSpawner> = Api::namespaced(client, &args.namespace);
            let spawners = list_or_get(&api, args.name.as_deref()).await?;
            print_spawners(&spawners);
        }
    }
    Ok(())
}

async fn list_or_get<K>(api: &Api<K>, name: Option<&str>) -> Result<Vec<K>>
where
    K: kube::Resource + Clone + std::fmt::Debug + for<'de> serde::Deserialize<'de>,
    K::DynamicType: Default,
{
    match name {
        Some(name) => Ok(vec![api.get(name).await.with_context(|| format!("getting {name}"))?]),
        None => Ok(api.list(&ListParams::default()).await.context("listing objects")?.items),
    }
}

fn print_tasks(tasks: &[Task]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["NAME", "TYPE", "PHASE", "JOB", "AGE"]);
    for task in tasks {
        let status = task.status.clone().unwrap_or_default();
        table.add_row(vec![
            task.name_any(),
            task.spec.kind.to_string(),
            status.phase.to_string(),
            status.job_name.unwrap_or_default(),
            age(task.metadata.creation_timestamp.as_ref()),
        ]);
    }
    println!("{table}");
}

fn print_spawners(spawners: &[TaskSpawner]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "NAME",
        "PHASE",
        "DEPLOYMENT",
        "DISCOVERED",
        "CREATED",
        "ACTIVE",
    ]);
    for spawner in spawners {
        let status = spawner.status.clone().unwrap_or_default();
        table.add_row(vec![
            spawner.name_any(),
            format!("{:?}", status.phase),
            status.deployment_name.unwrap_or_default(),
            status.total_discovered.to_string(),
            status.total_tasks_created.to_string(),
            status.active_tasks.to_string(),
        ]);
    }
    println!("{table}");
}

fn age(created: Option<&k8s_openapi::apimachinery::pkg::apis::meta::v1::Time>) -> String {
    let Some(created) = created else { return "<unknown>".to_string() };
    let elapsed = chrono::Utc::now() - created.0;
    if elapsed.num_days() > 0 {
        format!("{}d", elapsed.num_days())
    } else if elapsed.num_hours() > 0 {
        format!("{}h", elapsed.num_hours())
    } else if elapsed.num_minutes() > 0 {
        format!("{}m", elapsed.num_minutes())
    } else {
        format!("{}s", elapsed.num_seconds().max(0))
    }
}
