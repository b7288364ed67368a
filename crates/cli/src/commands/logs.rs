// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `axon logs`: streams a Task's Pod logs, with the same marker-block
//! pretty-printer the Task reconciler uses to capture `status.outputs`.
//! No reconciliation semantics — this just finds the Pod labeled
//! `axon.io/task=<name>` and either dumps its raw log or the extracted
//! output lines.

use anyhow::{bail, Context as _, Result};
use axon_core::constants::LABEL_TASK;
use clap::Args;
use futures::{AsyncBufReadExt, TryStreamExt};
use k8s_openapi::api::core::v1::Pod;
use kube::api::{ListParams, LogParams};
use kube::{Api, ResourceExt};

#[derive(Args)]
pub struct LogsArgs {
    /// Name of the Task whose Pod logs to print.
    pub name: String,
    #[arg(short, long, default_value = "default")]
    pub namespace: String,
    /// Follow the log stream instead of printing what's buffered so far.
    #[arg(short, long)]
    pub follow: bool,
    /// Print only the extracted `---AXON_OUTPUTS_START---`/`_END---` block.
    #[arg(long)]
    pub outputs: bool,
}

pub async fn logs(args: LogsArgs) -> Result<()> {
    let client = kube::Client::try_default().await.context("connecting to cluster")?;
    let pods: Api<Pod> = Api::namespaced(client, &args.namespace);

    let lp = ListParams::default().labels(&format!("{LABEL_TASK}={}", args.name));
    let list = pods.list(&lp).await.context("listing pods for task")?;
    let Some(pod) = list.items.into_iter().next() else {
        bail!("no pod found for task {} (labels {LABEL_TASK}={})", args.name, args.name);
    };
    let pod_name = pod.name_any();

    if args.follow {
        let log_params = LogParams { follow: true, ..Default::default() };
        let stream = pods.log_stream(&pod_name, &log_params).await.context("streaming pod logs")?;
        let mut lines = stream.lines();
        while let Some(line) = lines.try_next().await.context("reading pod log stream")? {
            println!("{line}");
        }
        return Ok(());
    }

    let log_params = LogParams::default();
    let log = pods.logs(&pod_name, &log_params).await.context("reading pod logs")?;

    if args.outputs {
        match axon_builder::parse_outputs(&log) {
            Some(lines) => {
                for line in lines {
                    println!("{line}");
                }
            }
            None => eprintln!("no output markers found in {pod_name}'s log"),
        }
    } else {
        print!("{log}");
    }

    Ok(())
}
