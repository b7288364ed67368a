// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn service_account_and_role_binding_share_the_fixed_name() {
    let sa = build_spawner_service_account("ns1");
    let rb = build_spawner_role_binding("ns1");
    assert_eq!(sa.metadata.name.as_deref(), Some(SPAWNER_SERVICE_ACCOUNT));
    assert_eq!(rb.metadata.name.as_deref(), Some(SPAWNER_SERVICE_ACCOUNT));
    assert_eq!(rb.role_ref.name, SPAWNER_CLUSTER_ROLE);
    let subject = &rb.subjects.unwrap()[0];
    assert_eq!(subject.namespace.as_deref(), Some("ns1"));
}
