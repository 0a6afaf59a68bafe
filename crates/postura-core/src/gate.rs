// SPDX-License-Identifier: Apache-2.0

//! Outcome gate: decides whether findings should fail the build.

use crate::error::PosturaError;
use crate::types::{IssueInstance, Severity};

/// Returns the issues at or above the severity threshold.
///
/// Unknown severities rank as medium, so `threshold = medium` counts them.
#[must_use]
pub fn significant_issues<'a>(
    threshold: Severity,
    issues: &'a [IssueInstance],
) -> Vec<&'a IssueInstance> {
    issues
        .iter()
        .filter(|issue| issue.severity.rank() >= threshold.rank())
        .collect()
}

/// Evaluates the gate.
///
/// # Errors
///
/// Returns `PosturaError::IssuesAboveThreshold` when `fail_on_issues` is set
/// and at least one issue reaches the threshold. This is the deliberate
/// nonzero exit signal, not an operational failure.
pub fn evaluate(
    fail_on_issues: bool,
    threshold: Severity,
    issues: &[IssueInstance],
) -> Result<(), PosturaError> {
    if !fail_on_issues || issues.is_empty() {
        return Ok(());
    }

    let significant = significant_issues(threshold, issues);
    if significant.is_empty() {
        return Ok(());
    }

    Err(PosturaError::IssuesAboveThreshold {
        count: significant.len(),
        threshold,
    })
}
