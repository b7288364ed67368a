//! `parseManifests ∘ serialize` is the identity on every embedded
//! manifest document: re-serializing a parsed object and re-parsing it
//! must reproduce the same object, independent of the CLI that
//! eventually applies it.

use kube::api::DynamicObject;
use serde::Deserialize;
use similar_asserts::assert_eq;
use std::path::Path;

fn manifest_path(file: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("crates/cli/manifests").join(file)
}

fn parse_all(doc: &str) -> Vec<DynamicObject> {
    serde_yaml::Deserializer::from_str(doc)
        .map(|d| DynamicObject::deserialize(d).expect("manifest document parses"))
        .collect()
}

#[test]
fn every_embedded_manifest_round_trips_through_yaml() {
    for file in ["crds.yaml", "rbac.yaml", "controller.yaml"] {
        let raw = std::fs::read_to_string(manifest_path(file)).unwrap_or_else(|e| panic!("{file}: {e}"));
        let parsed = parse_all(&raw);
        assert!(!parsed.is_empty(), "{file} produced no documents");

        for object in &parsed {
            let serialized = serde_yaml::to_string(object).unwrap_or_else(|e| panic!("{file}: {e}"));
            let reparsed: DynamicObject =
                serde_yaml::from_str(&serialized).unwrap_or_else(|e| panic!("{file}: {e}"));
            let reserialized =
                serde_yaml::to_string(&reparsed).unwrap_or_else(|e| panic!("{file}: {e}"));
            assert_eq!(serialized, reserialized);
        }
    }
}

#[test]
fn every_manifest_object_has_a_kind_and_name() {
    for file in ["crds.yaml", "rbac.yaml", "controller.yaml"] {
        let raw = std::fs::read_to_string(manifest_path(file)).unwrap();
        for object in parse_all(&raw) {
            assert!(object.types.is_some(), "{file}: object missing apiVersion/kind");
            assert!(object.metadata.name.is_some(), "{file}: object missing metadata.name");
        }
    }
}
