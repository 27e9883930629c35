// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local indexer over a vcpkg `info/` directory of `*.list` files.

use anyhow::Context;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::database::{Database, PackageId};
use crate::errors::{OwnersDbError, Result};

const LISTING_SUFFIX: &str = ".list";

/// Listing file found in the info directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFile {
    pub path: PathBuf,
    pub package: PackageId,
}

/// Scanner over a single info directory.
pub struct ListingScanner {
    root: PathBuf,
}

impl ListingScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// List non-hidden listing files, sorted by file name.
    pub fn list_files(&self) -> Result<Vec<ListingFile>> {
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry
                .with_context(|| format!("Failed to scan {}", self.root.display()))?;
            if is_hidden(entry.file_name().to_str()) {
                continue;
            }
            if entry.file_type().is_dir() {
                tracing::debug!("skipping directory {}", entry.path().display());
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            let package = package_from_file_name(&file_name)?;
            files.push(ListingFile {
                path: entry.into_path(),
                package,
            });
        }
        Ok(files)
    }

    /// Read every listing file into a fresh database.
    pub fn index(&self) -> Result<(Database, usize)> {
        let files = self.list_files()?;
        let mut database = Database::new();
        for file in &files {
            let content = std::fs::read_to_string(&file.path)
                .with_context(|| format!("Failed to read {}", file.path.display()))?;
            index_listing(&file.package, &content, &mut database);
        }
        tracing::info!(
            "Indexed {} listing file(s) from {}",
            files.len(),
            self.root.display()
        );
        Ok((database, files.len()))
    }
}

fn is_hidden(name: Option<&str>) -> bool {
    name.map(|name| name.starts_with('.')).unwrap_or(false)
}

/// `<name>_<version>_<qualifier>.list` -> `<name>:<qualifier>`
pub fn package_from_file_name(file_name: &str) -> Result<PackageId> {
    let components: Vec<&str> = file_name.split('_').collect();
    if components.len() < 3 {
        return Err(OwnersDbError::ListingName(file_name.to_string()));
    }
    let qualifier = components[2]
        .strip_suffix(LISTING_SUFFIX)
        .unwrap_or(components[2]);
    Ok(PackageId::new(components[0], qualifier))
}

/// Add the file records of one listing body to `database`.
pub fn index_listing(package: &PackageId, content: &str, database: &mut Database) {
    for line in content.lines() {
        if let Some(path) = listing_line_path(line) {
            database.push(package, path);
        }
    }
}

/// Installed path named by a listing line, or `None` for blank and directory lines.
///
/// Some listing formats prefix each path with a non-path segment such as
/// `x64-windows/`; everything before the first `/` is dropped.
pub fn listing_line_path(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.ends_with('/') {
        return None;
    }
    match line.find('/') {
        Some(idx) => Some(&line[idx..]),
        None => Some(line),
    }
}
