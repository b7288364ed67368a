// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lease-based leader election.
//!
//! A single `coordination.k8s.io/v1` Lease named `axon-controller` acts
//! as the lock: whoever holds `spec.holderIdentity` with a
//! `renewTime` inside `leaseDurationSeconds` is leader. Losing the race
//! (or the lease) just means retrying later — nothing here assumes it
//! is the only replica running the acquire loop.

use chrono::Utc;
use k8s_openapi::api::coordination::v1::{Lease, LeaseSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{MicroTime, ObjectMeta};
use kube::api::{Patch, PatchParams, PostParams};
use kube::Api;
use std::time::Duration;

const LEASE_DURATION_SECS: i32 = 15;

/// Block until this identity holds the lease, renewing it in the
/// background for as long as the returned guard is alive. Renewal
/// failures are logged and retried; losing the lease terminates the
/// process so the Kubernetes Deployment restarts it and it re-enters
/// the acquire loop as a fresh candidate.
pub async fn acquire(client: kube::Client, namespace: &str, lease_name: &str, identity: &str) {
    let leases: Api<Lease> = Api::namespaced(client, namespace);

    loop {
        match try_acquire_or_renew(&leases, lease_name, identity).await {
            Ok(true) => {
                tracing::info!(identity, "acquired leader lease");
                break;
            }
            Ok(false) => {
                tracing::debug!("leader lease held by another replica, waiting");
            }
            Err(e) => {
                tracing::warn!(error = %e, "leader lease acquisition attempt failed");
            }
        }
        tokio::time::sleep(Duration::from_secs(LEASE_DURATION_SECS as u64 / 3)).await;
    }

    let leases_bg = leases;
    let identity = identity.to_string();
    let lease_name = lease_name.to_string();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(LEASE_DURATION_SECS as u64 / 3)).await;
            if let Err(e) = renew(&leases_bg, &lease_name, &identity).await {
                tracing::error!(error = %e, "failed to renew leader lease, exiting");
                std::process::exit(1);
            }
        }
    });
}

async fn try_acquire_or_renew(leases: &Api<Lease>, name: &str, identity: &str) -> kube::Result<bool> {
    match leases.get_opt(name).await? {
        None => {
            let lease = Lease {
                metadata: ObjectMeta { name: Some(name.to_string()), ..Default::default() },
                spec: Some(LeaseSpec {
                    holder_identity: Some(identity.to_string()),
                    lease_duration_seconds: Some(LEASE_DURATION_SECS),
                    renew_time: Some(MicroTime(Utc::now())),
                    acquire_time: Some(MicroTime(Utc::now())),
                    lease_transitions: Some(0),
                    ..Default::default()
                }),
            };
            match leases.create(&PostParams::default(), &lease).await {
                Ok(_) => Ok(true),
                Err(kube::Error::Api(resp)) if resp.code == 409 => Ok(false),
                Err(e) => Err(e),
            }
        }
        Some(existing) => {
            let spec = existing.spec.unwrap_or_default();
            let expired = spec
                .renew_time
                .as_ref()
                .map(|t| Utc::now() - t.0 > chrono::Duration::seconds(LEASE_DURATION_SECS.into()))
                .unwrap_or(true);
            let held_by_us = spec.holder_identity.as_deref() == Some(identity);
            if !held_by_us && !expired {
                return Ok(false);
            }
            renew(leases, name, identity).await?;
            Ok(true)
        }
    }
}

async fn renew(leases: &Api<Lease>, name: &str, identity: &str) -> kube::Result<()> {
    let patch = serde_json::json!({
        "spec": {
            "holderIdentity": identity,
            "renewTime": Utc::now().to_rfc3339(),
            "leaseDurationSeconds": LEASE_DURATION_SECS,
        }
    });
    leases.patch(name, &PatchParams::apply("axon-controller"), &Patch::Apply(patch)).await?;
    Ok(())
}
