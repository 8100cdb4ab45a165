//! Dragonfly - command-line client for Dragonfly dome controllers.
//!
//! Each invocation opens one UDP session, runs one subcommand, closes the
//! session and prints a JSON report on stdout. Logs go to stderr and are
//! filtered by `RUST_LOG`.

mod cli;
mod report;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use dragonfly_client::DomeController;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    let config = cli.session_config();
    let report = DomeController::scoped(&config, |dome| {
        report::execute(dome, &cli.command, cli.channels)
    })
    .with_context(|| format!("{:?} failed on {}:{}", cli.command, config.host, config.port))?;

    serde_json::to_string_pretty(&report).context("failed to serialize report")
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
