// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn every_embedded_manifest_parses_as_dynamic_objects() {
    for (name, doc) in manifests::all() {
        let objects = parse_documents(doc).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert!(!objects.is_empty(), "{name} produced no documents");
        for object in &objects {
            assert!(object.gvk().is_ok(), "{name}: object missing apiVersion/kind");
            assert!(!object.name_any().is_empty(), "{name}: object missing metadata.name");
        }
    }
}
