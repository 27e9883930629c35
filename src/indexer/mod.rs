// SPDX-License-Identifier: MIT OR Apache-2.0

//! Indexer module - turns listing files or cache archives into ownership records

pub mod archive;
pub mod listing;
pub mod remote;

pub use listing::ListingScanner;
pub use remote::{index_changed_ports, RemoteIndex, SkipReason};
