// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definition for Postura.
//!
//! Uses clap's derive API. Every scan option can also come from the
//! `POSTURA_*` environment, which is how CI drives the tool; flags given on
//! the command line win.

use std::io::IsTerminal;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use postura_core::{ReportFormat, ScanScope, Severity};

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown-flavored summary table (default)
    Table,
    /// JSON output for programmatic consumption
    Json,
    /// SARIF 2.1.0 file output
    Sarif,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Table => ReportFormat::Table,
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Sarif => ReportFormat::Sarif,
        }
    }
}

/// Scan scope selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScanType {
    /// Scan the repository from the CI context
    Repository,
    /// Scan every repository in an organization
    Organization,
    /// Scan every organization in an enterprise
    Enterprise,
}

impl From<ScanType> for ScanScope {
    fn from(scan_type: ScanType) -> Self {
        match scan_type {
            ScanType::Repository => ScanScope::Repository,
            ScanType::Organization => ScanScope::Organization,
            ScanType::Enterprise => ScanScope::Enterprise,
        }
    }
}

/// Minimum severity counted as significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeverityThreshold {
    /// Count everything
    Low,
    /// Medium and above
    Medium,
    /// High and critical only
    High,
    /// Critical only
    Critical,
}

impl From<SeverityThreshold> for Severity {
    fn from(threshold: SeverityThreshold) -> Self {
        match threshold {
            SeverityThreshold::Low => Severity::Low,
            SeverityThreshold::Medium => Severity::Medium,
            SeverityThreshold::High => Severity::High,
            SeverityThreshold::Critical => Severity::Critical,
        }
    }
}

/// Global output configuration passed to commands.
#[derive(Clone, Copy)]
pub struct OutputContext {
    /// Resolved output format.
    pub format: ReportFormat,
    /// Suppress non-essential output (spinners).
    pub quiet: bool,
    /// Whether stdout is a terminal (TTY).
    pub is_tty: bool,
}

impl OutputContext {
    /// Creates an `OutputContext` from the resolved format and CLI flags.
    pub fn new(format: ReportFormat, quiet: bool) -> Self {
        Self {
            format,
            quiet,
            is_tty: std::io::stdout().is_terminal(),
        }
    }

    /// Returns true if interactive elements (spinners) should be shown.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && !self.quiet && matches!(self.format, ReportFormat::Table)
    }
}

/// Postura - CI security posture scan orchestration.
///
/// Triggers a scan through the scanning API, waits for it to complete,
/// reports the findings, and optionally fails the build on a severity
/// threshold.
#[derive(Parser)]
#[command(name = "postura")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Output format (table, json, sarif); overrides POSTURA_OUTPUT_FORMAT
    #[arg(long, short = 'o', global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Suppress non-essential output (spinners, progress)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug-level logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run a scan: create, wait, report, and gate the build
    Scan {
        /// Scope to scan; overrides POSTURA_SCAN_TYPE
        #[arg(long, value_enum)]
        scan_type: Option<ScanType>,

        /// Organization identifier for organization scans
        #[arg(long)]
        organization_id: Option<String>,

        /// Enterprise identifier for enterprise scans
        #[arg(long)]
        enterprise_id: Option<String>,

        /// Comma-separated check types to run
        #[arg(long, value_delimiter = ',')]
        check_types: Option<Vec<String>>,

        /// Comma-separated repository visibility filter
        #[arg(long, value_delimiter = ',')]
        visibility: Option<Vec<String>>,

        /// Exit nonzero when issues at or above the threshold are found
        #[arg(long)]
        fail_on_issues: bool,

        /// Minimum severity counted as significant
        #[arg(long, value_enum)]
        severity_threshold: Option<SeverityThreshold>,

        /// Do not wait for the scan to complete
        #[arg(long)]
        no_wait: bool,

        /// Polling timeout in minutes
        #[arg(long, value_name = "MINUTES")]
        timeout: Option<u64>,
    },

    /// Fetch the current status of a scan
    Status {
        /// Scan identifier
        scan_id: String,
    },

    /// List the issue instances produced by a scan
    Issues {
        /// Scan identifier
        scan_id: String,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
