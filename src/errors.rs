// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types with helpful suggestions
//!
//! Every failure that ends a run is an [`OwnersDbError`]; the binary maps it
//! to an exit code with [`OwnersDbError::exit_code`].

use std::path::PathBuf;
use thiserror::Error;

/// Exit code for usage and configuration errors.
pub const EXIT_USAGE: u8 = 2;

/// Exit code for runtime failures.
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Error)]
pub enum OwnersDbError {
    /// Bad or missing command-line arguments.
    #[error("{message}\n\nUsage: {usage}")]
    Usage { message: String, usage: &'static str },

    /// The ABI map passed with `--pr-hashes` does not exist.
    #[error(
        "pr-hashes file not found: {}\n\n\
         Suggestion: pass the JSON file produced by the CI ABI step.\n\
         Example: owners-db cache --pr-hashes pr-hashes.json --blob-base-url <url>",
        .0.display()
    )]
    HashesNotFound(PathBuf),

    /// The blob base URL could not be parsed.
    #[error(
        "invalid blob base URL provided: {url} ({source})\n\n\
         The URL should include the SAS token, e.g. \
         https://<account>.blob.core.windows.net/<container>/?<sas>"
    )]
    InvalidBlobUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// `git diff` could not be run or rejected the revision range.
    #[error("git diff failed for range {range}: {reason}; this is fatal in cache mode")]
    GitDiff { range: String, reason: String },

    /// A listing file name does not follow `<name>_<version>_<qualifier>.list`.
    #[error(
        "malformed listing file name '{0}'\n\n\
         Expected underscore-separated components: <package>_<version>_<triplet>.list"
    )]
    ListingName(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OwnersDbError {
    pub fn usage(message: impl Into<String>, usage: &'static str) -> Self {
        Self::Usage {
            message: message.into(),
            usage,
        }
    }

    /// Process exit code for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage { .. }
            | Self::HashesNotFound(_)
            | Self::InvalidBlobUrl { .. }
            | Self::GitDiff { .. } => EXIT_USAGE,
            Self::ListingName(_) | Self::Other(_) => EXIT_FAILURE,
        }
    }
}

pub type Result<T, E = OwnersDbError> = std::result::Result<T, E>;
