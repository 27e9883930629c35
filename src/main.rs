// SPDX-License-Identifier: MIT OR Apache-2.0

//! owners-db - vcpkg file ownership databases
//!
//! Thin driver: parses arguments, sets up logging, runs one subcommand and
//! turns its outcome into an exit code.

mod cli;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use owners_db::blob::HttpFetcher;
use owners_db::commands::{run_cache, run_list, ListOptions};
use owners_db::config::Config;
use owners_db::errors::{OwnersDbError, Result};
use owners_db::output::{print_summary, RunSummary};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match &err {
                OwnersDbError::Other(inner) => eprintln!("Error: {inner:#}"),
                other => eprintln!("Error: {other}"),
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let format = cli.format.unwrap_or_default();
    let config = Config::load();

    let summary: RunSummary = match cli.command {
        Commands::List { info_dir, out_dir } => run_list(&ListOptions {
            info_dir,
            out_dir: config.merge_out_dir(out_dir),
        })?,
        Commands::Cache(args) => {
            let options = args.resolve(&config)?;
            let fetcher = HttpFetcher::new(&options.user_agent);
            run_cache(&options, &fetcher)?
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "owners-db", &mut std::io::stdout());
            return Ok(());
        }
    };

    if !cli.quiet {
        print_summary(&summary, format, cli.compact)?;
    }
    Ok(())
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,owners_db={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}
