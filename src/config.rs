// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for owners-db
//!
//! Loads configuration from .ownersdbrc.toml in current directory or ~/.config/owners-db/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUT_DIR: &str = "scripts/list_files";

/// Default branch the PR is diffed against.
pub const DEFAULT_TARGET_BRANCH: &str = "master";

/// Default root of the port recipes inside the repository.
pub const DEFAULT_PORTS_DIR: &str = "ports";

/// Configuration loaded from .ownersdbrc.toml or ~/.config/owners-db/config.toml
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the two databases are written to
    pub out_dir: Option<PathBuf>,
    /// Branch used as the left side of `<branch>...HEAD`
    pub target_branch: Option<String>,
    /// Repository-relative directory holding the port recipes
    pub ports_dir: Option<String>,
    /// User-Agent sent with blob downloads
    pub user_agent: Option<String>,
}

impl Config {
    /// Load configuration from files
    ///
    /// Precedence (highest to lowest):
    /// 1. .ownersdbrc.toml in current directory
    /// 2. ~/.config/owners-db/config.toml
    pub fn load() -> Self {
        if let Some(config) = Self::load_from_path(Path::new(".ownersdbrc.toml")) {
            return config;
        }

        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".config").join("owners-db").join("config.toml");
            if let Some(config) = Self::load_from_path(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    fn load_from_path(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Merge CLI output directory with config (CLI wins)
    pub fn merge_out_dir(&self, cli_value: Option<PathBuf>) -> PathBuf {
        cli_value
            .or_else(|| self.out_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR))
    }

    /// Merge CLI target branch with config (CLI wins)
    pub fn merge_target_branch(&self, cli_value: Option<String>) -> String {
        cli_value
            .or_else(|| self.target_branch.clone())
            .unwrap_or_else(|| DEFAULT_TARGET_BRANCH.to_string())
    }

    pub fn ports_dir(&self) -> &str {
        self.ports_dir
            .as_deref()
            .map(|dir| dir.trim_matches('/'))
            .filter(|dir| !dir.is_empty())
            .unwrap_or(DEFAULT_PORTS_DIR)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("owners-db/{}", env!("CARGO_PKG_VERSION")))
    }
}
