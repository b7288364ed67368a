// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{DateTime, Utc};

fn item() -> WorkItem {
    WorkItem {
        id: "issue-42".to_string(),
        number: Some(42),
        title: "fix the thing".to_string(),
        body: "it's broken".to_string(),
        url: Some("https://github.com/o/r/issues/42".to_string()),
        kind: "issue".to_string(),
        time: DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc),
        schedule: None,
        comments: vec!["me too".to_string()],
        labels: vec!["bug".to_string()],
    }
}

#[test]
fn renders_named_variables() {
    let rendered = render_prompt("#{{Number}}: {{Title}}\n{{Body}}\nurl={{URL}}", &item()).unwrap();
    assert_eq!(rendered, "#42: fix the thing\nit's broken\nurl=https://github.com/o/r/issues/42");
}

#[test]
fn missing_optional_fields_render_as_empty_not_an_error() {
    let mut it = item();
    it.number = None;
    it.url = None;
    let rendered = render_prompt("{{Number}}|{{URL}}", &it).unwrap();
    assert_eq!(rendered, "|");
}

#[test]
fn malformed_template_is_a_render_error() {
    assert!(render_prompt("{{#if}}", &item()).is_err());
}
