// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GitHub issues (and, optionally, pull requests) as a discovery
//! source. A thin typed `reqwest` client, in the same shape as the
//! adapter clients elsewhere in this codebase: one struct owning a
//! `reqwest::Client` and a base URL, mapped errors, structured logging
//! on failure.

use super::{Source, SourceError, WorkItem};
use async_trait::async_trait;
use axon_core::taskspawner::GithubIssuesSource;
use chrono::{DateTime, Utc};
use serde::Deserialize;

const PER_PAGE: u32 = 100;

/// Reads issues (and optionally PRs — the `/issues` endpoint returns
/// both, distinguished by the presence of a `pull_request` field) from
/// one repository, paginating with label/state filters applied
/// server-side.
pub struct GithubIssuesClient {
    http: reqwest::Client,
    base_url: String,
    spec: GithubIssuesSource,
}

impl GithubIssuesClient {
    /// `base_url` is `https://api.github.com` for github.com or
    /// `https://<host>/api/v3` for GitHub Enterprise, matching the
    /// `--github-api-base-url` flag the Deployment is given.
    pub fn new(spec: GithubIssuesSource, base_url: String, token: Option<&str>) -> Self {
        let mut builder = reqwest::Client::builder().user_agent("axon-spawner");
        if let Some(token) = token {
            let mut headers = reqwest::header::HeaderMap::new();
            if let Ok(value) = reqwest::header::HeaderValue::from_str(&format!("Bearer {token}")) {
                headers.insert(reqwest::header::AUTHORIZATION, value);
            }
            builder = builder.default_headers(headers);
        }
        Self {
            // Client::builder() only fails on TLS backend init; the
            // defaults here never exercise that path.
            http: builder.build().unwrap_or_default(),
            base_url,
            spec,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GithubIssue {
    number: u64,
    title: String,
    #[serde(default)]
    body: Option<String>,
    html_url: String,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
    #[serde(default)]
    labels: Vec<GithubLabel>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct GithubLabel {
    name: String,
}

#[async_trait]
impl Source for GithubIssuesClient {
    async fn discover(&self) -> Result<Vec<WorkItem>, SourceError> {
        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let mut request = self
                .http
                .get(format!(
                    "{}/repos/{}/{}/issues",
                    self.base_url, self.spec.owner, self.spec.repo
                ))
                .query(&[
                    ("state", self.spec.state.as_str()),
                    ("per_page", &PER_PAGE.to_string()),
                    ("page", &page.to_string()),
                ]);
            if !self.spec.labels.is_empty() {
                request = request.query(&[("labels", self.spec.labels.join(","))]);
            }

            let response = request.send().await.map_err(|e| SourceError::Http(e.to_string()))?;
            if !response.status().is_success() {
                return Err(SourceError::Http(format!(
                    "github issues request failed with status {}",
                    response.status()
                )));
            }
            let batch: Vec<GithubIssue> =
                response.json().await.map_err(|e| SourceError::Http(e.to_string()))?;
            let batch_len = batch.len();

            for issue in batch {
                let is_pr = issue.pull_request.is_some();
                if is_pr && !self.spec.include_prs {
                    continue;
                }
                items.push(WorkItem {
                    id: format!("issue-{}", issue.number),
                    number: Some(issue.number),
                    title: issue.title,
                    body: issue.body.unwrap_or_default(),
                    url: Some(issue.html_url),
                    kind: if is_pr { "pull_request".to_string() } else { "issue".to_string() },
                    time: issue.created_at,
                    schedule: None,
                    comments: Vec::new(),
                    labels: issue.labels.into_iter().map(|l| l.name).collect(),
                });
            }

            if batch_len < PER_PAGE as usize {
                break;
            }
            page += 1;
        }
        Ok(items)
    }
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
