// SPDX-License-Identifier: Apache-2.0

//! CLI-specific error formatting with user-friendly hints.
//!
//! Downcasts `anyhow::Error` to `PosturaError` and adds hints for the error
//! types a CI user can act on. A threshold breach gets no hint: it is the
//! tool doing its job, not a failure to diagnose.

use anyhow::Error;
use postura_core::PosturaError;

/// Formats an error for CLI display with helpful hints.
///
/// If the error is not a `PosturaError`, returns the original error message.
pub fn format_error(error: &Error) -> String {
    if let Some(postura_err) = error.downcast_ref::<PosturaError>() {
        match postura_err {
            PosturaError::Config { message: _ } => {
                format!(
                    "{postura_err}\n\nTip: Scan inputs come from POSTURA_* environment variables \
                     or {}.",
                    postura_core::config_file_path().display()
                )
            }
            PosturaError::Api { status, .. } => {
                let mut msg = postura_err.to_string();
                if matches!(status, Some(401 | 403)) {
                    msg.push_str("\n\nTip: Check your POSTURA_TOKEN - it may be expired or missing scopes.");
                }
                msg
            }
            PosturaError::Network(_) => {
                format!("{postura_err}\n\nTip: Check your internet connection and the POSTURA_API_URL value.")
            }
            PosturaError::OrganizationNotFound { .. } => {
                format!(
                    "{postura_err}\n\nTip: The organization must be onboarded to the scanning service first."
                )
            }
            PosturaError::Timeout { .. } => {
                format!(
                    "{postura_err}\n\nTip: Raise POSTURA_TIMEOUT_MINUTES or rerun with --timeout for long scans."
                )
            }
            // Deliberate exit signal and local failures carry their own context.
            PosturaError::IssuesAboveThreshold { .. }
            | PosturaError::Serialize(_)
            | PosturaError::Io(_) => postura_err.to_string(),
        }
    } else {
        error.to_string()
    }
}
