// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! RBAC objects for the Spawner Loop: a namespaced `ServiceAccount` and
//! a `RoleBinding` to the cluster-scoped `axon-spawner` `ClusterRole`
//! the install manifests define (read its own TaskSpawner; create
//! Tasks in-namespace). Both are idempotent creates — the TaskSpawner
//! reconciler swallows `AlreadyExists` the same way the Task reconciler
//! does for Jobs, since these objects are shared across every spawner
//! in a namespace and never need to be patched once created.

use axon_core::constants::{child_labels, LABEL_COMPONENT_SPAWNER, SPAWNER_SERVICE_ACCOUNT};
use k8s_openapi::api::core::v1::ServiceAccount;
use k8s_openapi::api::rbac::v1::{RoleBinding, RoleRef, Subject};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Name of the cluster-scoped `ClusterRole` the install manifests grant
/// least-privilege access under (read its own TaskSpawner; create
/// Tasks in-namespace). Referenced, never built, by this crate.
pub const SPAWNER_CLUSTER_ROLE: &str = "axon-spawner";

/// Build the shared spawner `ServiceAccount` for a namespace.
pub fn build_spawner_service_account(namespace: &str) -> ServiceAccount {
    ServiceAccount {
        metadata: ObjectMeta {
            name: Some(SPAWNER_SERVICE_ACCOUNT.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(child_labels(LABEL_COMPONENT_SPAWNER)),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Build the `RoleBinding` granting the spawner `ServiceAccount` the
/// `axon-spawner` `ClusterRole`, scoped to `namespace`.
pub fn build_spawner_role_binding(namespace: &str) -> RoleBinding {
    RoleBinding {
        metadata: ObjectMeta {
            name: Some(SPAWNER_SERVICE_ACCOUNT.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(child_labels(LABEL_COMPONENT_SPAWNER)),
            ..Default::default()
        },
        role_ref: RoleRef {
            api_group: "rbac.authorization.k8s.io".to_string(),
            kind: "ClusterRole".to_string(),
            name: SPAWNER_CLUSTER_ROLE.to_string(),
        },
        subjects: Some(vec![Subject {
            kind: "ServiceAccount".to_string(),
            name: SPAWNER_SERVICE_ACCOUNT.to_string(),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        }]),
    }
}

#[cfg(test)]
#[path = "rbac_tests.rs"]
mod tests;
