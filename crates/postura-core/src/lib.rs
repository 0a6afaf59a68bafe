// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # Postura Core
//!
//! Core library for the Postura CLI - CI security posture scan orchestration.
//!
//! This crate provides reusable components for:
//! - The scanning API client (bearer-token auth, typed endpoints)
//! - CI context resolution from the environment
//! - Polling a scan until it reaches a terminal state
//! - Report formatting (table, JSON, SARIF)
//! - The severity-threshold outcome gate
//! - CI output files (`GITHUB_OUTPUT`, `GITHUB_STEP_SUMMARY`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use postura_core::{PollSettings, PosturaClient, wait_for_completion};
//!
//! # async fn example() -> Result<(), postura_core::PosturaError> {
//! let config = postura_core::load_config()?;
//! let client = PosturaClient::new(&config)?;
//!
//! let created = client
//!     .create_repository_scan("github_acme_widgets", &config.check_types)
//!     .await?;
//!
//! let status =
//!     wait_for_completion(&client, &created.scan_id, &PollSettings::from_config(&config)).await?;
//! let issues = client.issue_instances(&created.scan_id).await?;
//! println!("{} is {} with {} issues", created.scan_id, status.status, issues.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`client`] - Scanning API client
//! - [`config`] - Configuration loading and paths
//! - [`context`] - CI context resolution
//! - [`error`] - Error types
//! - [`poller`] - Scan completion polling
//! - [`report`] - Result formatting
//! - [`sarif`] - SARIF 2.1.0 generation
//! - [`gate`] - Severity-threshold outcome gate
//! - [`ci`] - CI output files

// ============================================================================
// Error Handling
// ============================================================================

pub use error::PosturaError;

/// Convenience Result type for Postura operations.
///
/// This is equivalent to `std::result::Result<T, PosturaError>`.
pub type Result<T> = std::result::Result<T, PosturaError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{AppConfig, config_dir, config_file_path, load_config};

// ============================================================================
// Data Model
// ============================================================================

pub use types::{
    IssueContext, IssueInstance, Organization, ScanCreated, ScanScope, ScanState, ScanStatus,
    Severity,
};

// ============================================================================
// API Client
// ============================================================================

pub use client::PosturaClient;

// ============================================================================
// CI Integration
// ============================================================================

pub use ci::{scan_url, set_output, set_summary};
pub use context::{CiContext, parse_owner_repo, repository_id};

// ============================================================================
// Polling
// ============================================================================

pub use poller::{PollSettings, ScanStatusSource, wait_for_completion};

// ============================================================================
// Reporting
// ============================================================================

pub use gate::{evaluate as evaluate_gate, significant_issues};
pub use report::{ReportFormat, SeverityCounts, format_scan_results, severity_counts};
pub use sarif::SarifReport;

// ============================================================================
// Modules
// ============================================================================

pub mod ci;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod gate;
pub mod poller;
pub mod report;
pub mod sarif;
pub mod types;
