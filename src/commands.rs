// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entry points for the `list` and `cache` subcommands.
//!
//! Both return a [`RunSummary`] or an [`OwnersDbError`]; exiting the process
//! is left to the binary.

use std::path::PathBuf;

use crate::abi_map::AbiMap;
use crate::blob::{BlobBase, BlobFetcher};
use crate::changed_ports::ChangeSet;
use crate::database::Database;
use crate::errors::Result;
use crate::indexer::{index_changed_ports, ListingScanner};
use crate::output::{write_database, RunSummary};

/// Options for indexing a local `info/` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub info_dir: PathBuf,
    pub out_dir: PathBuf,
}

/// Options for indexing the binary cache archives of changed ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOptions {
    pub pr_hashes: PathBuf,
    pub blob_base_url: String,
    pub target_branch: String,
    pub out_dir: PathBuf,
    /// Working tree the diff runs in
    pub repo: PathBuf,
    pub ports_dir: String,
    pub user_agent: String,
}

pub fn run_list(options: &ListOptions) -> Result<RunSummary> {
    let (database, listing_files) = ListingScanner::new(&options.info_dir).index()?;
    let output = write_database(&options.out_dir, &database)?;
    Ok(RunSummary {
        mode: "list",
        packages_indexed: listing_files,
        packages_skipped: Vec::new(),
        records: database.files().len(),
        header_records: database.headers().len(),
        output,
    })
}

pub fn run_cache(options: &CacheOptions, fetcher: &dyn BlobFetcher) -> Result<RunSummary> {
    let abis = AbiMap::load(&options.pr_hashes)?;
    let blob_base = BlobBase::parse(&options.blob_base_url)?;
    let changes = ChangeSet::from_diff(&options.repo, &options.target_branch, &options.ports_dir)?;

    if changes.is_empty() {
        tracing::info!(
            "git diff found no changed ports under {}/ for range {}; writing empty databases",
            options.ports_dir,
            changes.range()
        );
        let output = write_database(&options.out_dir, &Database::new())?;
        return Ok(RunSummary {
            mode: "cache",
            packages_indexed: 0,
            packages_skipped: Vec::new(),
            records: 0,
            header_records: 0,
            output,
        });
    }

    tracing::info!(
        "{} changed port(s) in {}: {}",
        changes.ports().len(),
        changes.range(),
        changes.ports().join(", ")
    );
    let index = index_changed_ports(&changes, &abis, &blob_base, fetcher);
    let output = write_database(&options.out_dir, &index.database)?;
    Ok(RunSummary {
        mode: "cache",
        packages_indexed: index.indexed.len(),
        packages_skipped: index.skipped.into_iter().map(|(port, _)| port).collect(),
        records: index.database.files().len(),
        header_records: index.database.headers().len(),
        output,
    })
}
