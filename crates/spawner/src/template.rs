// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt template rendering: `promptTemplate` is a `handlebars`
//! template over a fixed variable set (`Number`, `Title`, `Body`,
//! `URL`, `Comments`, `Labels`, `ID`, `Kind`, `Time`, `Schedule`). A
//! render error is the caller's signal to log and skip the item rather
//! than fail the whole discovery cycle.

use crate::source::WorkItem;
use handlebars::Handlebars;
use serde::Serialize;

#[derive(Serialize)]
struct TemplateContext {
    #[serde(rename = "Number")]
    number: Option<u64>,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Body")]
    body: String,
    #[serde(rename = "URL")]
    url: Option<String>,
    #[serde(rename = "Comments")]
    comments: Vec<String>,
    #[serde(rename = "Labels")]
    labels: Vec<String>,
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Kind")]
    kind: String,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Schedule")]
    schedule: Option<String>,
}

impl From<&WorkItem> for TemplateContext {
    fn from(item: &WorkItem) -> Self {
        Self {
            number: item.number,
            title: item.title.clone(),
            body: item.body.clone(),
            url: item.url.clone(),
            comments: item.comments.clone(),
            labels: item.labels.clone(),
            id: item.id.clone(),
            kind: item.kind.clone(),
            time: item.time.to_rfc3339(),
            schedule: item.schedule.clone(),
        }
    }
}

/// Render `prompt_template` against `item`'s fields. Registers the
/// template under a fixed name per call — the Spawner Loop renders
/// infrequently enough (once per discovered item per poll interval)
/// that caching a `Handlebars` registry across calls isn't worth the
/// complexity.
pub fn render_prompt(prompt_template: &str, item: &WorkItem) -> Result<String, handlebars::RenderError> {
    let mut reg = Handlebars::new();
    reg.set_strict_mode(false);
    let context = TemplateContext::from(item);
    reg.render_template(prompt_template, &context)
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
