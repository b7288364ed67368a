// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Source` trait and the shared `WorkItem` shape every source
//! discovers into — the Spawner Loop's single fan-in point regardless
//! of whether work comes from GitHub or a cron tick.

pub mod cron_source;
pub mod github;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// One discovered candidate. Field names match the fixed template
/// variable list (`Number`, `Title`, `Body`, `URL`, `Comments`,
/// `Labels`, `ID`, `Kind`, `Time`, `Schedule`) once run through
/// [`crate::template::render_prompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub id: String,
    pub number: Option<u64>,
    pub title: String,
    pub body: String,
    pub url: Option<String>,
    pub kind: String,
    pub time: DateTime<Utc>,
    pub schedule: Option<String>,
    pub comments: Vec<String>,
    pub labels: Vec<String>,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("http error: {0}")]
    Http(String),
    #[error("source error: {0}")]
    Other(String),
}

/// A discovery source. `discover` returns the full set of currently
/// visible candidates; filtering (exclude labels) and dedup (existing
/// Task names) happen in the caller, not here, so every source stays a
/// thin read-only adapter over its backend.
#[async_trait]
pub trait Source: Send + Sync {
    async fn discover(&self) -> Result<Vec<WorkItem>, SourceError>;
}

pub use cron_source::CronTickSource;
pub use github::GithubIssuesClient;
