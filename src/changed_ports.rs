// SPDX-License-Identifier: MIT OR Apache-2.0

//! Git changed-ports detection for the cache indexer.

use std::collections::HashSet;
use std::path::Path;
use std::process::Command;

use crate::errors::{OwnersDbError, Result};

/// Port names touched by `git diff <target>...HEAD`, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    range: String,
    ports: Vec<String>,
}

impl ChangeSet {
    /// Run the diff in `repo` and collect the changed ports under `ports_dir`.
    pub fn from_diff(repo: &Path, target_branch: &str, ports_dir: &str) -> Result<Self> {
        let range = format!("{}...HEAD", target_branch);
        let scope = format!("{}/", ports_dir);
        let stdout = run_git_diff(repo, &range, &scope)?;
        let ports = ports_from_diff_output(&String::from_utf8_lossy(&stdout), ports_dir);
        tracing::debug!("{} changed port(s) in {}", ports.len(), range);
        Ok(Self { range, ports })
    }

    pub fn from_ports<I, S>(range: impl Into<String>, ports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let ports = ports
            .into_iter()
            .map(Into::into)
            .filter(|port: &String| seen.insert(port.clone()))
            .collect();
        Self {
            range: range.into(),
            ports,
        }
    }

    pub fn range(&self) -> &str {
        &self.range
    }

    pub fn ports(&self) -> &[String] {
        &self.ports
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

fn run_git_diff(repo: &Path, range: &str, scope: &str) -> Result<Vec<u8>> {
    let git = which::which("git").map_err(|err| OwnersDbError::GitDiff {
        range: range.to_string(),
        reason: format!("git executable not found: {err}"),
    })?;
    run_git_diff_with(&git, repo, range, scope)
}

fn run_git_diff_with(git: &Path, repo: &Path, range: &str, scope: &str) -> Result<Vec<u8>> {
    let output = Command::new(git)
        .arg("-C")
        .arg(repo)
        .args(["diff", "--name-only", range, "--", scope])
        .output()
        .map_err(|err| OwnersDbError::GitDiff {
            range: range.to_string(),
            reason: format!("failed to run {}: {err}", git.display()),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(OwnersDbError::GitDiff {
            range: range.to_string(),
            reason: stderr.trim().to_string(),
        });
    }
    Ok(output.stdout)
}

/// First path segment below `ports_dir` for every changed path, deduplicated.
pub fn ports_from_diff_output(stdout: &str, ports_dir: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ports = Vec::new();
    for line in stdout.lines() {
        let Some(port) = port_of_path(line.trim(), ports_dir) else {
            continue;
        };
        if seen.insert(port) {
            ports.push(port.to_string());
        }
    }
    ports
}

fn port_of_path<'a>(path: &'a str, ports_dir: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(ports_dir)?.strip_prefix('/')?;
    let port = rest.split('/').next()?;
    if port.is_empty() {
        None
    } else {
        Some(port)
    }
}
