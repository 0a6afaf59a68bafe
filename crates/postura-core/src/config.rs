// SPDX-License-Identifier: Apache-2.0

//! Configuration management for the Postura CLI.
//!
//! Provides layered configuration from an optional file and environment
//! variables, which is how the tool is driven in CI.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `POSTURA_`)
//! 2. Config file: `~/.config/postura/config.toml`
//! 3. Built-in defaults
//!
//! List-valued keys accept comma-separated values:
//!
//! ```bash
//! POSTURA_CHECK_TYPES=secrets,dependabot postura scan
//! ```

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::PosturaError;
use crate::report::ReportFormat;
use crate::types::{ScanScope, Severity};

/// Application configuration.
///
/// Flat by design: each field maps to one `POSTURA_*` environment variable,
/// matching how CI systems pass scan parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the scanning API.
    pub api_url: String,
    /// Bearer token for API authentication. Required for all API operations.
    pub token: Option<String>,
    /// Scope to scan: repository, organization, or enterprise.
    pub scan_type: ScanScope,
    /// Organization identifier for organization scans.
    pub organization_id: Option<String>,
    /// Enterprise identifier for enterprise scans.
    pub enterprise_id: Option<String>,
    /// Check types to run.
    pub check_types: Vec<String>,
    /// Repository visibility filter for organization/enterprise scans.
    pub visibility_filter: Vec<String>,
    /// Exit nonzero when issues at or above the threshold are found.
    pub fail_on_issues: bool,
    /// Minimum severity counted as significant by the outcome gate.
    pub severity_threshold: Severity,
    /// Output format: table, json, or sarif.
    pub output_format: ReportFormat,
    /// Wait for the scan to reach a terminal state before reporting.
    pub wait_for_completion: bool,
    /// Polling timeout in minutes.
    pub timeout_minutes: u64,
    /// Delay between successful status polls, in seconds.
    pub poll_interval_seconds: u64,
    /// Delay before re-polling after a transient failure, in seconds.
    pub retry_interval_seconds: u64,
    /// Socket-level timeout for each HTTP request, in seconds.
    pub http_timeout_seconds: u64,
    /// Path the SARIF report is written to when requested.
    pub sarif_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.postura.dev".to_string(),
            token: None,
            scan_type: ScanScope::Repository,
            organization_id: None,
            enterprise_id: None,
            check_types: [
                "branch_protection",
                "admin_rights",
                "dependabot",
                "secrets",
                "secret_scanning",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            visibility_filter: ["public", "internal", "private"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            fail_on_issues: false,
            severity_threshold: Severity::Medium,
            output_format: ReportFormat::Table,
            wait_for_completion: true,
            timeout_minutes: 30,
            poll_interval_seconds: 10,
            retry_interval_seconds: 5,
            http_timeout_seconds: 30,
            sarif_file: "postura-results.sarif".to_string(),
        }
    }
}

/// Returns the Postura configuration directory.
///
/// Respects the `XDG_CONFIG_HOME` environment variable if set,
/// otherwise defaults to `~/.config/postura`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return PathBuf::from(xdg_config).join("postura");
    }
    dirs::home_dir()
        .expect("Could not determine home directory - is HOME set?")
        .join(".config")
        .join("postura")
}

/// Returns the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load application configuration.
///
/// Loads from the config file (if it exists) and environment variables.
/// Environment variables use the prefix `POSTURA_`; `check_types` and
/// `visibility_filter` parse as comma-separated lists.
///
/// # Errors
///
/// Returns `PosturaError::Config` if the config file exists but is invalid,
/// or an environment value cannot be parsed.
pub fn load_config() -> Result<AppConfig, PosturaError> {
    let config_path = config_file_path();

    let config = Config::builder()
        // Load from config file (optional - may not exist)
        .add_source(File::with_name(config_path.to_string_lossy().as_ref()).required(false))
        // Override with environment variables
        .add_source(
            Environment::with_prefix("POSTURA")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("check_types")
                .with_list_parse_key("visibility_filter"),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_load_config_defaults() {
        // Without any config file or env vars, should return defaults
        let config = load_config().expect("should load with defaults");

        assert_eq!(config.api_url, "https://api.postura.dev");
        assert_eq!(config.token, None);
        assert_eq!(config.scan_type, ScanScope::Repository);
        assert_eq!(config.check_types.len(), 5);
        assert_eq!(config.visibility_filter.len(), 3);
        assert!(!config.fail_on_issues);
        assert_eq!(config.severity_threshold, Severity::Medium);
        assert_eq!(config.output_format, ReportFormat::Table);
        assert!(config.wait_for_completion);
        assert_eq!(config.timeout_minutes, 30);
        assert_eq!(config.poll_interval_seconds, 10);
        assert_eq!(config.retry_interval_seconds, 5);
        assert_eq!(config.http_timeout_seconds, 30);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        unsafe {
            std::env::set_var("POSTURA_TOKEN", "tok-123");
            std::env::set_var("POSTURA_SCAN_TYPE", "organization");
            std::env::set_var("POSTURA_CHECK_TYPES", "secrets,dependabot");
            std::env::set_var("POSTURA_FAIL_ON_ISSUES", "true");
            std::env::set_var("POSTURA_TIMEOUT_MINUTES", "5");
        }

        let config = load_config().expect("should load from env");

        assert_eq!(config.token.as_deref(), Some("tok-123"));
        assert_eq!(config.scan_type, ScanScope::Organization);
        assert_eq!(config.check_types, vec!["secrets", "dependabot"]);
        assert!(config.fail_on_issues);
        assert_eq!(config.timeout_minutes, 5);

        unsafe {
            std::env::remove_var("POSTURA_TOKEN");
            std::env::remove_var("POSTURA_SCAN_TYPE");
            std::env::remove_var("POSTURA_CHECK_TYPES");
            std::env::remove_var("POSTURA_FAIL_ON_ISSUES");
            std::env::remove_var("POSTURA_TIMEOUT_MINUTES");
        }
    }

    #[test]
    #[serial]
    fn test_unknown_severity_threshold_falls_back_to_unknown_bucket() {
        unsafe {
            std::env::set_var("POSTURA_SEVERITY_THRESHOLD", "catastrophic");
        }

        let config = load_config().expect("should load");
        // Unknown threshold strings rank alongside medium, like upstream.
        assert_eq!(config.severity_threshold, Severity::Unknown);
        assert_eq!(config.severity_threshold.rank(), Severity::Medium.rank());

        unsafe {
            std::env::remove_var("POSTURA_SEVERITY_THRESHOLD");
        }
    }

    #[test]
    #[serial]
    fn test_config_dir_respects_xdg_config_home() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", "/custom/config");
        }

        let dir = config_dir();
        assert_eq!(dir, PathBuf::from("/custom/config/postura"));

        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with("config.toml"));
    }
}
