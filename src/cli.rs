// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use owners_db::commands::CacheOptions;
use owners_db::config::Config;
use owners_db::errors::{OwnersDbError, Result};
use owners_db::output::OutputFormat;

const CACHE_USAGE: &str = "owners-db cache --pr-hashes <FILE> --blob-base-url <URL> \
     [--target-branch <BRANCH>] [--out-dir <DIR>]\n       \
     owners-db cache <pr-hashes.json> <blob-base-url> [target-branch]";

/// owners-db - vcpkg file ownership databases
///
/// Generates VCPKGDatabase.txt and VCPKGHeadersDatabase.txt, mapping every
/// installed file to the port that owns it.
#[derive(Parser, Debug)]
#[command(name = "owners-db")]
#[command(
    author,
    version,
    about,
    long_about = None,
    after_help = "Examples:\n  owners-db list installed/vcpkg/info\n  owners-db cache --pr-hashes pr-hashes.json --blob-base-url \"https://<account>.blob.core.windows.net/<container>/?<sas>\""
)]
pub struct Cli {
    /// Summary output format (text or json)
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Compact JSON output (no pretty formatting)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Log debug details
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index the *.list files of an installed tree's info directory
    #[command(visible_aliases = ["local"])]
    List {
        /// Directory holding <port>_<version>_<triplet>.list files
        info_dir: PathBuf,

        /// Output directory (default: scripts/list_files)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Index binary cache archives of the ports changed against a target branch
    #[command(visible_aliases = ["remote"])]
    Cache(CacheArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Default)]
pub struct CacheArgs {
    /// JSON map of port name to { "abi": "<sha>" }
    #[arg(long)]
    pub pr_hashes: Option<PathBuf>,

    /// Blob container URL, including the SAS token query
    #[arg(long)]
    pub blob_base_url: Option<String>,

    /// Branch to diff against (default: master)
    #[arg(long)]
    pub target_branch: Option<String>,

    /// Output directory (default: scripts/list_files)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Git working tree to diff (defaults to current directory)
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Legacy form: <pr-hashes.json> <blob-base-url> [target-branch]
    #[arg(value_name = "LEGACY_ARGS")]
    pub legacy: Vec<String>,
}

impl CacheArgs {
    /// Resolve the flagged or legacy positional form into cache options.
    pub fn resolve(self, config: &Config) -> Result<CacheOptions> {
        let flagged = self.pr_hashes.is_some()
            || self.blob_base_url.is_some()
            || self.target_branch.is_some()
            || self.out_dir.is_some();

        let (pr_hashes, blob_base_url, target_branch, out_dir) = if self.legacy.is_empty() {
            let pr_hashes = self
                .pr_hashes
                .ok_or_else(|| OwnersDbError::usage("missing --pr-hashes", CACHE_USAGE))?;
            let blob_base_url = self
                .blob_base_url
                .ok_or_else(|| OwnersDbError::usage("missing --blob-base-url", CACHE_USAGE))?;
            (pr_hashes, blob_base_url, self.target_branch, self.out_dir)
        } else {
            if flagged {
                return Err(OwnersDbError::usage(
                    "flags and positional arguments cannot be mixed",
                    CACHE_USAGE,
                ));
            }
            let mut legacy = self.legacy.into_iter();
            let (Some(pr_hashes), Some(blob_base_url)) = (legacy.next(), legacy.next()) else {
                return Err(OwnersDbError::usage(
                    "expected <pr-hashes.json> <blob-base-url> [target-branch]",
                    CACHE_USAGE,
                ));
            };
            let target_branch = legacy.next();
            if let Some(extra) = legacy.next() {
                return Err(OwnersDbError::usage(
                    format!("unexpected positional argument '{}'", extra),
                    CACHE_USAGE,
                ));
            }
            (PathBuf::from(pr_hashes), blob_base_url, target_branch, None)
        };

        Ok(CacheOptions {
            pr_hashes,
            blob_base_url,
            target_branch: config
                .merge_target_branch(target_branch.filter(|branch| !branch.is_empty())),
            out_dir: config.merge_out_dir(out_dir),
            repo: self.repo.unwrap_or_else(|| PathBuf::from(".")),
            ports_dir: config.ports_dir().to_string(),
            user_agent: config.user_agent(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cache_args(args: &[&str]) -> CacheArgs {
        let mut argv = vec!["owners-db", "cache"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).expect("parse cache").command {
            Commands::Cache(args) => args,
            other => panic!("expected cache command, got {other:?}"),
        }
    }

    #[test]
    fn flagged_form_resolves() {
        let options = cache_args(&[
            "--pr-hashes",
            "hashes.json",
            "--blob-base-url",
            "https://a.example/c/?sv=1",
            "--target-branch",
            "main",
            "--out-dir",
            "out",
        ])
        .resolve(&Config::default())
        .expect("resolve");
        assert_eq!(options.pr_hashes, PathBuf::from("hashes.json"));
        assert_eq!(options.blob_base_url, "https://a.example/c/?sv=1");
        assert_eq!(options.target_branch, "main");
        assert_eq!(options.out_dir, PathBuf::from("out"));
        assert_eq!(options.ports_dir, "ports");
    }

    #[test]
    fn legacy_form_resolves_with_defaults() {
        let options = cache_args(&["hashes.json", "https://a.example/c"])
            .resolve(&Config::default())
            .expect("resolve");
        assert_eq!(options.pr_hashes, PathBuf::from("hashes.json"));
        assert_eq!(options.target_branch, "master");
        assert_eq!(options.out_dir, PathBuf::from("scripts/list_files"));

        let options = cache_args(&["hashes.json", "https://a.example/c", "release"])
            .resolve(&Config::default())
            .expect("resolve");
        assert_eq!(options.target_branch, "release");
    }

    #[test]
    fn mixing_forms_is_a_usage_error() {
        let err = cache_args(&["hashes.json", "https://a.example/c", "--out-dir", "out"])
            .resolve(&Config::default())
            .expect_err("mixed");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn excess_or_missing_positionals_are_usage_errors() {
        let err = cache_args(&["h.json", "https://a.example/c", "main", "extra"])
            .resolve(&Config::default())
            .expect_err("excess");
        assert!(err.to_string().contains("'extra'"));

        let err = cache_args(&["h.json"])
            .resolve(&Config::default())
            .expect_err("missing url");
        assert_eq!(err.exit_code(), 2);

        let err = cache_args(&[])
            .resolve(&Config::default())
            .expect_err("nothing");
        assert!(err.to_string().starts_with("missing --pr-hashes"));
    }

    #[test]
    fn unknown_flag_is_rejected_by_parser() {
        let err = Cli::try_parse_from(["owners-db", "cache", "--bogus"]).expect_err("unknown");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn list_alias_parses() {
        let cli = Cli::try_parse_from(["owners-db", "local", "info", "--out-dir", "db"])
            .expect("parse list alias");
        match cli.command {
            Commands::List { info_dir, out_dir } => {
                assert_eq!(info_dir, PathBuf::from("info"));
                assert_eq!(out_dir, Some(PathBuf::from("db")));
            }
            other => panic!("expected list command, got {other:?}"),
        }
    }
}
