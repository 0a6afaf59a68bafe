// SPDX-License-Identifier: Apache-2.0

//! Postura - CI security posture scan orchestration.
//!
//! A CLI tool that triggers security posture scans through the scanning
//! API, waits for results, reports them, and optionally fails the build on
//! a severity threshold.

mod cli;
mod commands;
mod errors;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use postura_core::ReportFormat;
use tracing::debug;

use crate::cli::{Cli, OutputContext};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(
        cli.output.map(ReportFormat::from).unwrap_or_default(),
        cli.verbose,
    );

    // Load config early to validate it works
    let mut config = postura_core::load_config().context("Failed to load configuration")?;
    debug!("Configuration loaded successfully");

    // Apply CLI overrides to config
    if let Some(output) = cli.output {
        config.output_format = output.into();
        debug!(format = ?config.output_format, "Overriding output format");
    }

    let output_ctx = OutputContext::new(config.output_format, cli.quiet);

    if let Err(e) = commands::run(cli.command, output_ctx, &config).await {
        let formatted = errors::format_error(&e);
        eprintln!("Error: {formatted}");
        std::process::exit(1);
    }
    Ok(())
}
