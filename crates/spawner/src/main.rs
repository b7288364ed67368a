// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawner Loop binary: polls the configured source at `AXON_POLL_INTERVAL`
//! (set on the container by `axon-builder::build_spawner_deployment`),
//! discovers work items, and creates Tasks for them. One process per
//! TaskSpawner Deployment.

use axon_core::taskspawner::GithubIssuesSource;
use axon_core::{parse_short_duration, SystemClock};
use axon_spawner::cycle::{run_cycle, CycleContext};
use axon_spawner::source::{CronTickSource, GithubIssuesClient, Source};
use clap::Parser;
use kube::Api;

#[derive(Parser, Debug)]
#[command(name = "axon-spawner-loop", version, about = "Spawner Loop for a single TaskSpawner")]
struct Cli {
    #[arg(long)]
    taskspawner_name: String,

    #[arg(long)]
    taskspawner_namespace: String,

    #[arg(long)]
    github_owner: Option<String>,

    #[arg(long)]
    github_repo: Option<String>,

    /// Defaults to `https://api.github.com`; set for GitHub Enterprise
    /// (`https://<host>/api/v3`).
    #[arg(long, default_value = "https://api.github.com")]
    github_api_base_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();
    let client = kube::Client::try_default().await?;

    let poll_interval = std::env::var("AXON_POLL_INTERVAL").unwrap_or_else(|_| "5m".to_string());
    let interval = parse_short_duration(&poll_interval)?;
    let github_token = std::env::var("GITHUB_TOKEN").ok();

    let spawners: Api<axon_core::TaskSpawner> =
        Api::namespaced(client.clone(), &cli.taskspawner_namespace);

    let ctx = CycleContext {
        client: client.clone(),
        namespace: cli.taskspawner_namespace.clone(),
        spawner_name: cli.taskspawner_name.clone(),
        clock: SystemClock,
    };

    let mut ticker = tokio::time::interval(interval);
    tracing::info!(
        spawner = %cli.taskspawner_name,
        namespace = %cli.taskspawner_namespace,
        interval = ?interval,
        "axon-spawner-loop started"
    );

    loop {
        ticker.tick().await;

        let spawner = match spawners.get(&cli.taskspawner_name).await {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "failed to re-read taskspawner, skipping this tick");
                continue;
            }
        };

        let source: Box<dyn Source> = match build_source(&cli, &spawner, &github_token) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "taskspawner.spec.when is invalid, skipping this tick");
                continue;
            }
        };

        if let Err(e) = run_cycle(&ctx, source.as_ref()).await {
            tracing::warn!(error = %e, "discovery cycle failed");
        }
    }
}

fn build_source(
    cli: &Cli,
    spawner: &axon_core::TaskSpawner,
    github_token: &Option<String>,
) -> anyhow::Result<Box<dyn Source>> {
    if let Some(gh) = &spawner.spec.when.github_issues {
        let spec = GithubIssuesSource {
            owner: cli.github_owner.clone().unwrap_or_else(|| gh.owner.clone()),
            repo: cli.github_repo.clone().unwrap_or_else(|| gh.repo.clone()),
            ..gh.clone()
        };
        let client =
            GithubIssuesClient::new(spec, cli.github_api_base_url.clone(), github_token.as_deref());
        return Ok(Box::new(client));
    }
    if let Some(cron) = &spawner.spec.when.cron {
        let source = CronTickSource::new(cron.schedule.clone(), SystemClock)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?;
        return Ok(Box::new(source));
    }
    anyhow::bail!("taskspawner.spec.when has neither githubIssues nor cron set")
}
