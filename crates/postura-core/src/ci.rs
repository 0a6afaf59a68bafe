// SPDX-License-Identifier: Apache-2.0

//! CI output files.
//!
//! GitHub Actions exposes two append-only files: `GITHUB_OUTPUT` for
//! key/value step outputs and `GITHUB_STEP_SUMMARY` for a free-text job
//! summary. When the variables are absent (local runs), writes are a no-op.

use std::fs::OpenOptions;
use std::io::Write;

use tracing::debug;

use crate::error::PosturaError;

/// Environment variable naming the step-outputs file.
pub const OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Environment variable naming the job-summary file.
pub const SUMMARY_ENV: &str = "GITHUB_STEP_SUMMARY";

fn append(path: &str, content: &str) -> Result<(), PosturaError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Sets a step output as a `name=value` line.
///
/// # Errors
///
/// Returns `PosturaError::Io` if the outputs file cannot be written.
pub fn set_output(name: &str, value: &str) -> Result<(), PosturaError> {
    if let Ok(path) = std::env::var(OUTPUT_ENV)
        && !path.is_empty()
    {
        append(&path, &format!("{name}={value}\n"))
    } else {
        debug!(name, value, "no {OUTPUT_ENV} file, skipping output");
        Ok(())
    }
}

/// Appends content to the job summary.
///
/// # Errors
///
/// Returns `PosturaError::Io` if the summary file cannot be written.
pub fn set_summary(content: &str) -> Result<(), PosturaError> {
    if let Ok(path) = std::env::var(SUMMARY_ENV)
        && !path.is_empty()
    {
        append(&path, content)
    } else {
        debug!("no {SUMMARY_ENV} file, skipping summary");
        Ok(())
    }
}

/// Derives the human-facing scan URL from the API base URL.
///
/// The web UI lives on the `app.` host that mirrors the `api.` host.
#[must_use]
pub fn scan_url(api_url: &str, scan_id: &str) -> String {
    let base = api_url.trim_end_matches('/').replacen("api.", "app.", 1);
    format!("{base}/scans/{scan_id}")
}
