// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `axon install`/`axon uninstall`: server-side apply (or delete) of
//! the embedded CRD, RBAC, and controller-Deployment manifests against
//! whatever cluster the ambient kubeconfig points at. Each YAML
//! document is applied independently via the dynamic API so this
//! carries no compile-time dependency on the exact kinds involved.

use anyhow::{Context as _, Result};
use clap::Args;
use kube::api::{DeleteParams, DynamicObject, Patch, PatchParams};
use kube::{discovery, Api, ResourceExt};

use crate::manifests;

const FIELD_MANAGER: &str = "axon-cli";

#[derive(Args)]
pub struct InstallArgs {
    /// Print what would be applied without contacting the cluster.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct UninstallArgs {
    /// Print what would be deleted without contacting the cluster.
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn install(args: InstallArgs) -> Result<()> {
    let pp = PatchParams::apply(FIELD_MANAGER);
    // Dry-run never needs a cluster: connect lazily, only once we know
    // we're about to apply something for real.
    let client = if args.dry_run {
        None
    } else {
        Some(kube::Client::try_default().await.context("connecting to cluster")?)
    };

    for (name, doc) in manifests::all() {
        for object in parse_documents(doc)? {
            let gvk = object.gvk().with_context(|| format!("{name}: object missing apiVersion/kind"))?;
            let object_name = object.name_any();

            let Some(client) = &client else {
                println!("would apply {gvk}/{object_name}");
                continue;
            };

            let (ar, _caps) = discovery::pinned_kind(client, &gvk)
                .await
                .with_context(|| format!("discovering API resource for {gvk}"))?;
            let api: Api<DynamicObject> = match object.namespace() {
                Some(ns) => Api::namespaced_with(client.clone(), &ns, &ar),
                None => Api::all_with(client.clone(), &ar),
            };
            api.patch(&object_name, &pp, &Patch::Apply(&object))
                .await
                .with_context(|| format!("applying {gvk}/{object_name}"))?;
            println!("applied {gvk}/{object_name}");
        }
    }
    Ok(())
}

pub async fn uninstall(args: UninstallArgs) -> Result<()> {
    let dp = DeleteParams::default();
    let client = if args.dry_run {
        None
    } else {
        Some(kube::Client::try_default().await.context("connecting to cluster")?)
    };

    // Reverse manifest order so the controller Deployment (which depends
    // on the RBAC it runs as) goes before the RBAC and CRDs it needs.
    for (name, doc) in manifests::all().into_iter().rev() {
        for object in parse_documents(doc)?.into_iter().rev() {
            let gvk = object.gvk().with_context(|| format!("{name}: object missing apiVersion/kind"))?;
            let object_name = object.name_any();

            let Some(client) = &client else {
                println!("would delete {gvk}/{object_name}");
                continue;
            };

            let (ar, _caps) = discovery::pinned_kind(client, &gvk)
                .await
                .with_context(|| format!("discovering API resource for {gvk}"))?;
            let api: Api<DynamicObject> = match object.namespace() {
                Some(ns) => Api::namespaced_with(client.clone(), &ns, &ar),
                None => Api::all_with(client.clone(), &ar),
            };
            match api.delete(&object_name, &dp).await {
                Ok(_) => println!("deleted {gvk}/{object_name}"),
                Err(kube::Error::Api(resp)) if resp.code == 404 => {
                    println!("{gvk}/{object_name} already absent");
                }
                Err(e) => return Err(e).with_context(|| format!("deleting {gvk}/{object_name}")),
            }
        }
    }
    Ok(())
}

fn parse_documents(doc: &str) -> Result<Vec<DynamicObject>> {
    serde_yaml::Deserializer::from_str(doc)
        .map(|d| DynamicObject::deserialize(d).context("parsing manifest document"))
        .collect()
}

#[cfg(test)]
#[path = "install_tests.rs"]
mod tests;
