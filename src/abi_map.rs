// SPDX-License-Identifier: MIT OR Apache-2.0

//! ABI hashes of the ports built by a PR (`pr-hashes.json`).
//!
//! Shape: `{ "<port>": { "abi": "<sha>" }, ... }`. Some producers write the
//! key as `ABI`.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::errors::{OwnersDbError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
struct AbiEntry {
    #[serde(default)]
    abi: Option<serde_json::Value>,
    #[serde(default, rename = "ABI")]
    abi_upper: Option<serde_json::Value>,
}

impl AbiEntry {
    fn hash(&self) -> Option<&str> {
        non_empty_str(self.abi.as_ref()).or_else(|| non_empty_str(self.abi_upper.as_ref()))
    }
}

fn non_empty_str(value: Option<&serde_json::Value>) -> Option<&str> {
    value
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Port name to ABI hash lookup.
#[derive(Debug, Clone, Default)]
pub struct AbiMap {
    entries: HashMap<String, AbiEntry>,
}

impl AbiMap {
    /// Load the map from a JSON file.
    ///
    /// A missing file is a configuration error; unreadable or malformed JSON
    /// is a runtime error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(OwnersDbError::HashesNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let map = Self::from_json(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!("Loaded {} ABI entries from {}", map.len(), path.display());
        Ok(map)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let raw: HashMap<String, serde_json::Value> = serde_json::from_str(content)?;
        let entries = raw
            .into_iter()
            .map(|(port, value)| {
                // Entries that are not objects simply carry no hash.
                let entry = serde_json::from_value(value).unwrap_or_default();
                (port, entry)
            })
            .collect();
        Ok(Self { entries })
    }

    /// ABI hash for `port`, preferring the lowercase key.
    pub fn abi_for(&self, port: &str) -> Option<&str> {
        self.entries.get(port).and_then(AbiEntry::hash)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
