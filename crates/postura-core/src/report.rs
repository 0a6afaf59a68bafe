// SPDX-License-Identifier: Apache-2.0

//! Report formatting for scan results.
//!
//! Pure functions from `(status, issues, format)` to an output string. The
//! table format is markdown-flavored so it can double as a CI job summary.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::PosturaError;
use crate::types::{IssueInstance, ScanStatus, Severity};

/// How many issues the table format lists individually before summarizing
/// the remainder as a count.
pub const MAX_LISTED_ISSUES: usize = 10;

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Markdown-flavored summary table.
    #[default]
    Table,
    /// Pretty-printed JSON passthrough of status and issues.
    Json,
    /// SARIF file output; stdout gets a one-line completion summary.
    Sarif,
}

/// Issue counts bucketed by severity.
///
/// Severities outside the known set land in `unknown` rather than being
/// dropped or crashing the count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    /// Critical issues.
    pub critical: usize,
    /// High severity issues.
    pub high: usize,
    /// Medium severity issues.
    pub medium: usize,
    /// Low severity issues.
    pub low: usize,
    /// Issues whose severity the client does not recognize.
    pub unknown: usize,
}

impl SeverityCounts {
    /// Total number of counted issues.
    #[must_use]
    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.unknown
    }
}

/// Counts issues by severity.
#[must_use]
pub fn severity_counts(issues: &[IssueInstance]) -> SeverityCounts {
    let mut counts = SeverityCounts::default();
    for issue in issues {
        match issue.severity {
            Severity::Critical => counts.critical += 1,
            Severity::High => counts.high += 1,
            Severity::Medium => counts.medium += 1,
            Severity::Low => counts.low += 1,
            Severity::Unknown => counts.unknown += 1,
        }
    }
    counts
}

/// Formats scan results for output.
///
/// # Errors
///
/// Returns `PosturaError::Serialize` if JSON serialization fails.
pub fn format_scan_results(
    status: &ScanStatus,
    issues: &[IssueInstance],
    format: ReportFormat,
) -> Result<String, PosturaError> {
    match format {
        ReportFormat::Json => {
            let value = json!({
                "scan": status,
                "issues": issues,
            });
            Ok(serde_json::to_string_pretty(&value)?)
        }
        ReportFormat::Table => Ok(format_table(status, issues)),
        ReportFormat::Sarif => Ok(format!(
            "Scan completed with {} issues found",
            issues.len()
        )),
    }
}

fn format_table(status: &ScanStatus, issues: &[IssueInstance]) -> String {
    let mut out = String::new();

    out.push_str("# Postura Scan Results\n\n");
    let _ = writeln!(
        out,
        "**Scan ID:** {}",
        status.scan_id.as_deref().unwrap_or("Unknown")
    );
    let _ = writeln!(out, "**Status:** {}", status.status);
    let _ = writeln!(
        out,
        "**Scope:** {}",
        status.scope.as_deref().unwrap_or("Unknown")
    );
    out.push('\n');

    if issues.is_empty() {
        out.push_str("✅ No security issues found!\n");
        return out;
    }

    let counts = severity_counts(issues);
    out.push_str("## Issue Summary\n\n");
    out.push_str("| Severity | Count |\n");
    out.push_str("|----------|-------|\n");
    let _ = writeln!(out, "| Critical | {} |", counts.critical);
    let _ = writeln!(out, "| High | {} |", counts.high);
    let _ = writeln!(out, "| Medium | {} |", counts.medium);
    let _ = writeln!(out, "| Low | {} |", counts.low);
    if counts.unknown > 0 {
        let _ = writeln!(out, "| Unknown | {} |", counts.unknown);
    }
    out.push('\n');

    out.push_str("## Issues Found\n\n");
    for issue in issues.iter().take(MAX_LISTED_ISSUES) {
        let _ = writeln!(out, "- **{}** ({})", issue.issue_id, issue.severity);
        if let Some(description) = &issue.context.description {
            let _ = writeln!(out, "  {description}");
        }
    }
    if issues.len() > MAX_LISTED_ISSUES {
        let _ = writeln!(out, "+{} more issues", issues.len() - MAX_LISTED_ISSUES);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IssueContext, ScanState};

    fn issue(id: &str, severity: Severity) -> IssueInstance {
        IssueInstance {
            issue_id: id.to_string(),
            severity,
            context: IssueContext {
                description: Some(format!("details for {id}")),
                file_path: None,
            },
            ..IssueInstance::default()
        }
    }

    fn completed_status() -> ScanStatus {
        ScanStatus {
            scan_id: Some("scan-42".to_string()),
            status: ScanState::Completed,
            scope: Some("repository".to_string()),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_severity_counts_with_unknown_bucket() {
        let issues = vec![
            issue("a", Severity::Critical),
            issue("b", Severity::High),
            issue("c", Severity::Unknown),
            issue("d", Severity::Unknown),
        ];
        let counts = severity_counts(&issues);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.high, 1);
        assert_eq!(counts.unknown, 2);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_table_lists_ten_and_summarizes_rest() {
        let issues: Vec<IssueInstance> = (0..12)
            .map(|i| issue(&format!("issue-{i}"), Severity::Medium))
            .collect();
        let table =
            format_scan_results(&completed_status(), &issues, ReportFormat::Table).unwrap();

        for i in 0..10 {
            assert!(table.contains(&format!("issue-{i}")), "missing issue-{i}");
        }
        assert!(!table.contains("issue-10"));
        assert!(!table.contains("issue-11"));
        assert!(table.contains("+2 more"));
    }

    #[test]
    fn test_table_no_issues() {
        let table = format_scan_results(&completed_status(), &[], ReportFormat::Table).unwrap();
        assert!(table.contains("No security issues found"));
        assert!(!table.contains("Issue Summary"));
    }

    #[test]
    fn test_table_header_fields() {
        let table = format_scan_results(
            &completed_status(),
            &[issue("x", Severity::Low)],
            ReportFormat::Table,
        )
        .unwrap();
        assert!(table.contains("**Scan ID:** scan-42"));
        assert!(table.contains("**Status:** completed"));
        assert!(table.contains("**Scope:** repository"));
    }

    #[test]
    fn test_json_round_trip() {
        let issues = vec![issue("a", Severity::High), issue("b", Severity::Low)];
        let status = completed_status();
        let output = format_scan_results(&status, &issues, ReportFormat::Json).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["scan"]["scan_id"], "scan-42");
        assert_eq!(parsed["scan"]["status"], "completed");

        let parsed_issues: Vec<IssueInstance> =
            serde_json::from_value(parsed["issues"].clone()).unwrap();
        assert_eq!(parsed_issues, issues);
    }

    #[test]
    fn test_sarif_format_summary_line() {
        let issues = vec![issue("a", Severity::High)];
        let line = format_scan_results(&completed_status(), &issues, ReportFormat::Sarif).unwrap();
        assert_eq!(line, "Scan completed with 1 issues found");
    }
}
