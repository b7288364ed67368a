//! `axon install`/`axon uninstall --dry-run` specs: no cluster is
//! contacted, so these can run anywhere and must still report every
//! embedded manifest document (CRDs, RBAC, controller Deployment).

use crate::prelude::*;

#[test]
fn install_dry_run_lists_crds_rbac_and_controller_without_a_cluster() {
    let output = cli().args(["install", "--dry-run"]).output().unwrap();
    assert!(output.status.success());
    let stdout = stdout_of(&output);

    assert!(stdout.contains("would apply"), "stdout:\n{stdout}");
    assert!(stdout.contains("CustomResourceDefinition"), "stdout:\n{stdout}");
    assert!(stdout.contains("ServiceAccount"), "stdout:\n{stdout}");
    assert!(stdout.contains("ClusterRole"), "stdout:\n{stdout}");
    assert!(stdout.contains("Deployment"), "stdout:\n{stdout}");
}

#[test]
fn uninstall_dry_run_lists_manifests_in_reverse_order() {
    let output = cli().args(["uninstall", "--dry-run"]).output().unwrap();
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("would delete"), "stdout:\n{stdout}");

    // The controller Deployment (applied last by `install`, so it can
    // assume its RBAC already exists) is deleted first.
    let deployment_pos = stdout.find("Deployment").expect("deployment line present");
    let crd_pos = stdout.find("CustomResourceDefinition").expect("crd line present");
    assert!(deployment_pos < crd_pos, "expected Deployment deletion before CRD deletion:\n{stdout}");
}

#[test]
fn dry_run_never_requires_a_reachable_cluster() {
    // Regression guard: install/uninstall --dry-run must short-circuit
    // before any kube::Client::try_default() connection attempt.
    for args in [["install", "--dry-run"], ["uninstall", "--dry-run"]] {
        let output = cli().args(args).output().unwrap();
        assert!(output.status.success(), "{args:?} failed:\n{}", stderr_of(&output));
    }
}
