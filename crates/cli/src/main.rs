// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `axon`: thin operator CLI over the Kubernetes API. Carries no
//! reconciliation semantics of its own — `axon install`/`axon
//! uninstall` apply or delete the embedded manifests, `axon get`
//! tabulates Tasks/TaskSpawners, and `axon logs` streams a Task's Pod
//! logs with the marker-block pretty-printer the Task Reconciler also
//! uses to capture `status.outputs`.

mod commands;
mod manifests;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "axon", version, about = "Operator CLI for the axon Kubernetes agent orchestrator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply the CRDs, RBAC, and controller/spawner-image Deployment manifests.
    Install(commands::install::InstallArgs),
    /// Delete everything `axon install` created.
    Uninstall(commands::install::UninstallArgs),
    /// List cluster objects (tasks, taskspawners).
    Get(commands::get::GetArgs),
    /// Stream a Task's Pod logs.
    Logs(commands::logs::LogsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Install(args) => commands::install::install(args).await,
        Command::Uninstall(args) => commands::install::uninstall(args).await,
        Command::Get(args) => commands::get::get(args).await,
        Command::Logs(args) => commands::logs::logs(args).await,
    }
}
