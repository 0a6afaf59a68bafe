// SPDX-License-Identifier: Apache-2.0

//! One-shot scan status fetch.

use anyhow::Result;
use console::style;
use postura_core::{AppConfig, PosturaClient, ReportFormat, ScanState};

use super::maybe_spinner;
use crate::cli::OutputContext;

pub async fn run(ctx: &OutputContext, config: &AppConfig, scan_id: &str) -> Result<()> {
    let client = PosturaClient::new(config)?;

    let spinner = maybe_spinner(ctx, "Fetching scan status...");
    let status = client.scan_status(scan_id).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let status = status?;

    match ctx.format {
        ReportFormat::Table => {
            let state = match status.status {
                ScanState::Completed => style(status.status.as_str()).green(),
                ScanState::Failed | ScanState::Cancelled => style(status.status.as_str()).red(),
                _ => style(status.status.as_str()).yellow(),
            };
            println!(
                "{} {}",
                style("Scan:").bold(),
                status.scan_id.as_deref().unwrap_or(scan_id)
            );
            println!("{} {state}", style("Status:").bold());
            if let Some(scope) = &status.scope {
                println!("{} {scope}", style("Scope:").bold());
            }
        }
        // A status has no findings to convert, so sarif falls back to JSON.
        ReportFormat::Json | ReportFormat::Sarif => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}
