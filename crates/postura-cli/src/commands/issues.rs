// SPDX-License-Identifier: Apache-2.0

//! One-shot issue instance listing for a scan.

use anyhow::Result;
use console::style;
use postura_core::{
    AppConfig, PosturaClient, ReportFormat, SarifReport, Severity, severity_counts,
};

use super::maybe_spinner;
use crate::cli::OutputContext;

pub async fn run(ctx: &OutputContext, config: &AppConfig, scan_id: &str) -> Result<()> {
    let client = PosturaClient::new(config)?;

    let spinner = maybe_spinner(ctx, "Fetching issue instances...");
    let issues = client.issue_instances(scan_id).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let issues = issues?;

    match ctx.format {
        ReportFormat::Table => {
            if issues.is_empty() {
                println!("{}", style("No issues found for this scan.").green());
                return Ok(());
            }

            let counts = severity_counts(&issues);
            let mut summary = format!(
                "{} issues (critical: {}, high: {}, medium: {}, low: {}",
                counts.total(),
                counts.critical,
                counts.high,
                counts.medium,
                counts.low
            );
            if counts.unknown > 0 {
                summary.push_str(&format!(", unknown: {}", counts.unknown));
            }
            summary.push(')');
            println!("{}", style(summary).bold());
            println!();

            for issue in &issues {
                let padded = format!("{:>8}", issue.severity.as_str());
                let severity = match issue.severity {
                    Severity::Critical | Severity::High => style(padded).red(),
                    Severity::Medium => style(padded).yellow(),
                    _ => style(padded).dim(),
                };
                println!("  {severity}  {}", issue.issue_id);
                if let Some(description) = &issue.context.description {
                    println!("            {}", style(description).dim());
                }
            }
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&issues)?);
        }
        ReportFormat::Sarif => {
            let sarif = SarifReport::from_issues(&issues);
            println!("{}", serde_json::to_string_pretty(&sarif)?);
        }
    }

    Ok(())
}
