// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn empty_agents_md_is_omitted() {
    let spec = AgentConfigSpec::default();
    let json = serde_json::to_value(&spec).unwrap();
    assert!(json.get("agentsMd").is_none());
    assert!(json.get("plugins").is_none());
}
