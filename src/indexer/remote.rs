// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache indexer: ports changed by a PR, resolved through their ABI hash to
//! archives in the binary cache.

use crate::abi_map::AbiMap;
use crate::blob::{BlobBase, BlobFetcher, FetchError};
use crate::changed_ports::ChangeSet;
use crate::database::{Database, PackageId};
use crate::indexer::archive::index_archive;

/// Why a port contributed no records.
#[derive(Debug)]
pub enum SkipReason {
    MissingAbi,
    Fetch(FetchError),
}

/// Result of indexing one change set.
#[derive(Debug, Default)]
pub struct RemoteIndex {
    pub database: Database,
    pub indexed: Vec<String>,
    pub skipped: Vec<(String, SkipReason)>,
}

/// Download and index the archive of every changed port, in change-set order.
///
/// Ports without an ABI entry or whose blob cannot be fetched or read are
/// logged and skipped.
pub fn index_changed_ports(
    changes: &ChangeSet,
    abis: &AbiMap,
    blob_base: &BlobBase,
    fetcher: &dyn BlobFetcher,
) -> RemoteIndex {
    let mut result = RemoteIndex::default();

    for port in changes.ports() {
        let Some(abi) = abis.abi_for(port) else {
            tracing::warn!("No ABI found for port {}; skipping", port);
            result.skipped.push((port.clone(), SkipReason::MissingAbi));
            continue;
        };

        tracing::info!(
            "Downloading {} for port {}...",
            blob_base.redacted_blob_url(abi),
            port
        );
        let package = PackageId::installed(port.as_str());
        let indexed = fetcher
            .fetch(&blob_base.blob_url(abi))
            .and_then(|bytes| index_archive(&package, &bytes));

        match indexed {
            Ok(database) => {
                tracing::debug!("{}: {} file(s)", package, database.files().len());
                result.database.extend(database);
                result.indexed.push(port.clone());
            }
            Err(err) => {
                tracing::warn!("Failed to download or process blob for {}: {}", port, err);
                result.skipped.push((port.clone(), SkipReason::Fetch(err)));
            }
        }
    }

    result
}
