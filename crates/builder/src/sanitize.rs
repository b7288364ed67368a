// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path and name sanitization for injected workspace files and plugin
//! bundles. Both the `plugin-setup` and the workspace-file init
//! container scripts assemble paths from user-supplied strings, so
//! these checks are the only thing standing between a Task spec and a
//! path traversal write outside the intended directory.

use axon_core::error::BuildError;
use std::path::{Component, Path};

/// Validate a path meant to be relative to the repo root.
///
/// Rejects: empty paths, backslashes, absolute paths, paths resolving to
/// `.`, and paths that escape the root (`..` or `../...`).
pub fn sanitize_relative_path(path: &str) -> Result<String, BuildError> {
    if path.is_empty() || path.contains('\\') {
        return Err(BuildError::UnsanitizablePath(path.to_string()));
    }
    let p = Path::new(path);
    if p.is_absolute() {
        return Err(BuildError::UnsanitizablePath(path.to_string()));
    }
    let mut normalized = Vec::new();
    for comp in p.components() {
        match comp {
            Component::Normal(seg) => normalized.push(seg.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(BuildError::UnsanitizablePath(path.to_string()));
            }
        }
    }
    if normalized.is_empty() {
        return Err(BuildError::UnsanitizablePath(path.to_string()));
    }
    Ok(normalized.join("/"))
}

/// Validate a plugin or skill/sub-agent name.
///
/// Rejects: empty names, path separators, and `.`/`..`.
pub fn sanitize_name(name: &str) -> Result<&str, BuildError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        return Err(BuildError::UnsanitizableName(name.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
#[path = "sanitize_tests.rs"]
mod tests;
