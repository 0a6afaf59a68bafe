// SPDX-License-Identifier: Apache-2.0

//! Error types for the Postura CLI.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Application code should use `anyhow::Result` for top-level error handling.

use thiserror::Error;

use crate::types::Severity;

/// Errors that can occur during Postura operations.
#[derive(Error, Debug)]
pub enum PosturaError {
    /// Configuration error - missing or invalid input.
    #[error("Configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// Scanning API returned a non-success response.
    #[error("API error: {message}")]
    Api {
        /// Error message, including any response body returned by the server.
        message: String,
        /// HTTP status code, if the response got that far.
        status: Option<u16>,
    },

    /// Network/HTTP error from reqwest.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Organization lookup by external name came up empty.
    #[error("Organization '{name}' not found in the scanning service")]
    OrganizationNotFound {
        /// The external organization name that was looked up.
        name: String,
    },

    /// The scan did not reach a terminal state within the timeout.
    #[error("Scan {scan_id} did not complete within {minutes} minutes")]
    Timeout {
        /// Identifier of the scan being polled.
        scan_id: String,
        /// Configured timeout in minutes.
        minutes: u64,
    },

    /// Issues at or above the configured severity threshold were found.
    ///
    /// This is a deliberate nonzero exit signal, not an operational failure.
    #[error("Scan found {count} issues at or above {threshold} severity")]
    IssuesAboveThreshold {
        /// Number of issues at or above the threshold.
        count: usize,
        /// The configured threshold.
        threshold: Severity,
    },

    /// Serialization failure while producing output.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// I/O failure while writing output artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for PosturaError {
    fn from(err: config::ConfigError) -> Self {
        PosturaError::Config {
            message: err.to_string(),
        }
    }
}
