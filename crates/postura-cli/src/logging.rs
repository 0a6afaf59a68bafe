// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the Postura CLI.
//!
//! Uses `tracing` with `tracing-subscriber`. Log level can be controlled via
//! the `RUST_LOG` environment variable; `-v` raises the default to debug.
//!
//! # Examples
//!
//! ```bash
//! # Default: info level for postura, errors only for dependencies
//! postura scan
//!
//! # Debug output for troubleshooting
//! RUST_LOG=postura=debug postura scan
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use postura_core::ReportFormat;

/// Initialize the logging subsystem.
///
/// Structured output formats (json, sarif) quiet the default filter so logs
/// never interleave with machine-readable stdout; logs always go to stderr.
/// The `RUST_LOG` environment variable overrides everything.
pub fn init_logging(format: ReportFormat, verbose: bool) {
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let default_filter = match (format, verbose) {
        (ReportFormat::Json | ReportFormat::Sarif, _) => "postura=warn,reqwest=error",
        (ReportFormat::Table, true) => "postura=debug,reqwest=error",
        (ReportFormat::Table, false) => "postura=info,reqwest=error",
    };
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .expect("valid default filter directives");

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
