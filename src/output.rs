// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database writer and run summary printing.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::database::Database;

pub const DATABASE_FILE_NAME: &str = "VCPKGDatabase.txt";
pub const HEADERS_FILE_NAME: &str = "VCPKGHeadersDatabase.txt";

/// Output format for the run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Locations of the two database files written by a run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OutputPaths {
    pub database: PathBuf,
    pub headers: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(out_dir: &Path) -> Self {
        Self {
            database: out_dir.join(DATABASE_FILE_NAME),
            headers: out_dir.join(HEADERS_FILE_NAME),
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: &'static str,
    /// Listing files read, or cache archives indexed.
    pub packages_indexed: usize,
    /// Cache packages skipped because of a missing ABI or a failed download.
    pub packages_skipped: Vec<String>,
    pub records: usize,
    pub header_records: usize,
    pub output: OutputPaths,
}

/// Write both databases into `out_dir`, replacing previous contents.
pub fn write_database(out_dir: &Path, database: &Database) -> Result<OutputPaths> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let paths = OutputPaths::in_dir(out_dir);
    replace_file(&paths.database, render_lines(database.files()).as_bytes())?;
    replace_file(&paths.headers, render_lines(database.headers()).as_bytes())?;

    tracing::info!(
        "Wrote {} ({} records) and {} ({} records)",
        paths.database.display(),
        database.files().len(),
        paths.headers.display(),
        database.headers().len()
    );
    Ok(paths)
}

/// Newline-joined records, newline-terminated only when non-empty.
fn render_lines(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Write `bytes` to a hidden sibling of `path`, then rename it into place.
fn replace_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("owners-db");
    let tmp_path = path.with_file_name(format!(".{}.tmp-{}", file_name, std::process::id()));

    if let Err(err) = std::fs::write(&tmp_path, bytes) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(err).with_context(|| format!("failed to write {}", tmp_path.display()));
    }
    if let Err(err) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(err).with_context(|| format!("failed to move database into {}", path.display()));
    }
    Ok(())
}

/// Print a value as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", text);
    Ok(())
}

pub fn print_summary(summary: &RunSummary, format: OutputFormat, compact: bool) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(summary, compact)?,
        OutputFormat::Text => {
            println!(
                "{} Indexed {} package(s) in {} mode",
                "✓".green(),
                summary.packages_indexed,
                summary.mode
            );
            println!(
                "  {}: {} records",
                summary.output.database.display(),
                summary.records
            );
            println!(
                "  {}: {} records",
                summary.output.headers.display(),
                summary.header_records
            );
            if !summary.packages_skipped.is_empty() {
                println!(
                    "  {} skipped: {}",
                    "!".yellow(),
                    summary.packages_skipped.join(", ")
                );
            }
        }
    }
    Ok(())
}
