// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository URL parsing — `(host, owner, repo)` extraction for both
//! HTTPS and SSH forms, used by the builder (GitHub Enterprise host
//! detection) and the spawner (`--github-owner`/`--github-repo` flags).

/// Parsed repository reference. `host` is empty for SSH URLs that don't
/// carry one in a recognizable position, or for inputs falling back to
/// the generic two-segment form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub host: String,
    pub owner: String,
    pub repo: String,
}

/// Parse a repository URL into `(host, owner, repo)`.
///
/// Strips a trailing `.git` first, then tries the HTTPS form
/// (`https://host/owner/repo`) and the SSH form (`git@host:owner/repo`).
/// Unknown forms fall back to the last two path segments as
/// `(owner, repo)` with an empty host.
pub fn parse_repo_url(url: &str) -> RepoRef {
    let trimmed = url.trim();
    let stripped = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    if let Some(rest) = stripped.strip_prefix("git@") {
        // git@host:owner/repo
        if let Some((host, path)) = rest.split_once(':') {
            let mut segs = path.trim_matches('/').rsplitn(2, '/');
            let repo = segs.next().unwrap_or_default();
            let owner = segs.next().unwrap_or_default();
            return RepoRef { host: host.to_string(), owner: owner.to_string(), repo: repo.to_string() };
        }
    }

    if let Some(rest) = stripped
        .strip_prefix("https://")
        .or_else(|| stripped.strip_prefix("http://"))
        .or_else(|| stripped.strip_prefix("git://"))
    {
        if let Some((host, path)) = rest.split_once('/') {
            let mut segs = path.trim_matches('/').rsplitn(2, '/');
            let repo = segs.next().unwrap_or_default();
            let owner = segs.next().unwrap_or_default();
            return RepoRef { host: host.to_string(), owner: owner.to_string(), repo: repo.to_string() };
        }
    }

    // Fallback: last two path segments, no host.
    let mut segs = stripped.trim_matches('/').rsplitn(2, '/');
    let repo = segs.next().unwrap_or_default();
    let owner = segs.next().unwrap_or_default();
    RepoRef { host: String::new(), owner: owner.to_string(), repo: repo.to_string() }
}

/// `true` if `host` names a GitHub Enterprise instance (non-empty, not
/// `github.com`).
pub fn is_enterprise_host(host: &str) -> bool {
    !host.is_empty() && host != "github.com"
}

#[cfg(test)]
#[path = "repo_url_tests.rs"]
mod tests;
