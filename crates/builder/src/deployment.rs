// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TaskSpawner → Deployment, and drift detection between a desired and
//! an observed Deployment.
//!
//! The Spawner Loop runs as a single-replica Deployment so Kubernetes
//! restarts it on crash and the TaskSpawner reconciler never has to
//! re-implement that. Build is pure; the reconciler is the one that
//! decides whether to create, patch, or leave a running Deployment
//! alone — it does so by calling [`diff_deployment`] against what it
//! observed.

use crate::repo_url::{is_enterprise_host, parse_repo_url};
use axon_core::constants::{
    child_labels, LABEL_APP, LABEL_APP_VALUE, LABEL_COMPONENT_SPAWNER, LABEL_TASKSPAWNER,
    SPAWNER_SERVICE_ACCOUNT,
};
use axon_core::error::BuildError;
use axon_core::taskspawner::TaskSpawnerSpec;
use axon_core::workspace::WorkspaceSpec;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, EnvVar, EnvVarSource, PodSpec, PodTemplateSpec, SecretKeySelector};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};

/// Build the desired Deployment for a TaskSpawner's Spawner Loop.
///
/// Validates `spec.when`'s exactly-one-of invariant (see
/// [`axon_core::taskspawner::When::validate`]) so a malformed spawner
/// fails at build time rather than producing a Deployment that can
/// never discover anything.
pub fn build_spawner_deployment(
    taskspawner_name: &str,
    namespace: &str,
    spec: &TaskSpawnerSpec,
    workspace: Option<&WorkspaceSpec>,
    spawner_image: &str,
) -> Result<Deployment, BuildError> {
    let variant = spec.when.validate()?;

    let mut labels = child_labels(LABEL_COMPONENT_SPAWNER);
    labels.insert(LABEL_TASKSPAWNER.to_string(), taskspawner_name.to_string());

    let mut args = vec![
        "--taskspawner-name".to_string(),
        taskspawner_name.to_string(),
        "--taskspawner-namespace".to_string(),
        namespace.to_string(),
    ];
    if variant == "githubIssues" {
        let gh = spec
            .when
            .github_issues
            .as_ref()
            .ok_or(BuildError::InvalidWhen("githubIssues selected but absent"))?;
        args.push("--github-owner".to_string());
        args.push(gh.owner.clone());
        args.push("--github-repo".to_string());
        args.push(gh.repo.clone());

        if let Some(ws) = workspace {
            let host = parse_repo_url(&ws.repo).host;
            if is_enterprise_host(&host) {
                args.push("--github-api-base-url".to_string());
                args.push(format!("https://{host}/api/v3"));
            }
        }
    }

    let mut env = vec![EnvVar {
        name: "AXON_POLL_INTERVAL".to_string(),
        value: Some(spec.poll_interval.clone()),
        ..Default::default()
    }];
    if let Some(secret_ref) = workspace.and_then(|w| w.secret_ref.as_deref()) {
        env.push(EnvVar {
            name: "GITHUB_TOKEN".to_string(),
            value_from: Some(EnvVarSource {
                secret_key_ref: Some(SecretKeySelector {
                    name: secret_ref.to_string(),
                    key: "GITHUB_TOKEN".to_string(),
                    optional: None,
                }),
                ..Default::default()
            }),
            ..Default::default()
        });
    }

    let container = Container {
        name: "spawner".to_string(),
        image: Some(spawner_image.to_string()),
        args: Some(args),
        env: Some(env),
        ..Default::default()
    };

    let pod_spec = PodSpec {
        containers: vec![container],
        service_account_name: Some(SPAWNER_SERVICE_ACCOUNT.to_string()),
        restart_policy: Some("Always".to_string()),
        ..Default::default()
    };

    let mut selector_labels = std::collections::BTreeMap::new();
    selector_labels.insert(LABEL_APP.to_string(), LABEL_APP_VALUE.to_string());
    selector_labels.insert(LABEL_TASKSPAWNER.to_string(), taskspawner_name.to_string());

    Ok(Deployment {
        metadata: ObjectMeta {
            name: Some(taskspawner_name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: LabelSelector { match_labels: Some(selector_labels), ..Default::default() },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta { labels: Some(labels), ..Default::default() }),
                spec: Some(pod_spec),
            },
            ..Default::default()
        }),
        status: None,
    })
}

/// Which fields of the single spawner container differ between a
/// desired and an observed Deployment. `false` in every field means no
/// patch is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeploymentDrift {
    pub image_changed: bool,
    pub args_changed: bool,
    pub env_changed: bool,
}

impl DeploymentDrift {
    pub fn any(&self) -> bool {
        self.image_changed || self.args_changed || self.env_changed
    }
}

/// Compare the main container of `desired` against `observed`.
///
/// Image and args are compared for ordered equality; env is compared
/// ordered, with `secretKeyRef`s compared on `(name, key)` rather than
/// by the `EnvVar`'s `Debug` form, since that's the only field that
/// matters for drift and keeps this resilient to unrelated API
/// defaulting of other `EnvVarSource` fields.
pub fn diff_deployment(desired: &Deployment, observed: &Deployment) -> DeploymentDrift {
    let desired_container = main_container(desired);
    let observed_container = main_container(observed);

    let (Some(d), Some(o)) = (desired_container, observed_container) else {
        return DeploymentDrift { image_changed: true, args_changed: true, env_changed: true };
    };

    DeploymentDrift {
        image_changed: d.image != o.image,
        args_changed: d.args != o.args,
        env_changed: !envs_equal(d.env.as_deref().unwrap_or_default(), o.env.as_deref().unwrap_or_default()),
    }
}

fn main_container(deployment: &Deployment) -> Option<&Container> {
    deployment.spec.as_ref()?.template.spec.as_ref()?.containers.first()
}

fn envs_equal(a: &[EnvVar], b: &[EnvVar]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(x, y)| {
        if x.name != y.name || x.value != y.value {
            return false;
        }
        let x_secret = x.value_from.as_ref().and_then(|v| v.secret_key_ref.as_ref());
        let y_secret = y.value_from.as_ref().and_then(|v| v.secret_key_ref.as_ref());
        match (x_secret, y_secret) {
            (None, None) => true,
            (Some(xs), Some(ys)) => xs.name == ys.name && xs.key == ys.key,
            _ => false,
        }
    })
}

#[cfg(test)]
#[path = "deployment_tests.rs"]
mod tests;
