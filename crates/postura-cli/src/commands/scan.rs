// SPDX-License-Identifier: Apache-2.0

//! The scan command: create a scan, wait for it, report, and gate the build.
//!
//! Control flow: resolve CI context → create scan → poll until terminal or
//! timeout → fetch issues → format/report → optionally fail on the severity
//! threshold.

use anyhow::Result;
use postura_core::{
    AppConfig, CiContext, PollSettings, PosturaClient, PosturaError, ReportFormat, SarifReport,
    ScanCreated, ScanScope, ScanState, ScanStatus, ci, format_scan_results, gate, repository_id,
    severity_counts, wait_for_completion,
};
use tracing::{debug, info, warn};

use super::maybe_spinner;
use crate::cli::OutputContext;

pub async fn run(ctx: &OutputContext, config: &AppConfig) -> Result<()> {
    let client = PosturaClient::new(config)?;
    let ci_context = CiContext::from_env()?;
    debug!(?ci_context, "resolved CI context");

    let created = create_scan(&client, config, &ci_context).await?;
    let scan_id = created.scan_id;
    info!(%scan_id, "scan created");

    ci::set_output("scan_id", &scan_id)?;
    ci::set_output("status", ScanState::Queued.as_str())?;

    let (final_status, issues) = if config.wait_for_completion {
        let spinner = maybe_spinner(ctx, "Waiting for scan to complete...");
        let settings = PollSettings::from_config(config);
        let outcome = wait_for_completion(&client, &scan_id, &settings).await;
        if let Some(s) = spinner {
            s.finish_and_clear();
        }

        match outcome {
            Ok(status) => {
                info!(state = %status.status, "scan finished");
                let issues = client.issue_instances(&scan_id).await?;
                info!(count = issues.len(), "fetched issue instances");
                (status, issues)
            }
            Err(error @ PosturaError::Timeout { .. }) => {
                warn!("{error}");
                // One final best-effort fetch; report whatever the scan
                // looks like right now.
                let status = client.scan_status(&scan_id).await?;
                (status, Vec::new())
            }
            Err(error) => return Err(error.into()),
        }
    } else {
        info!("not waiting for scan completion");
        (ScanStatus::queued(&scan_id), Vec::new())
    };

    report(config, &client, &scan_id, &final_status, &issues)?;

    gate::evaluate(config.fail_on_issues, config.severity_threshold, &issues)?;
    info!("scan completed successfully");
    Ok(())
}

/// Creates the scan for the configured scope.
async fn create_scan(
    client: &PosturaClient,
    config: &AppConfig,
    ci_context: &CiContext,
) -> Result<ScanCreated, PosturaError> {
    match config.scan_type {
        ScanScope::Repository => {
            let (Some(owner), Some(repo_name)) = (&ci_context.owner, &ci_context.repo_name) else {
                return Err(PosturaError::Config {
                    message: "Repository context not available - set GITHUB_REPOSITORY".to_string(),
                });
            };

            // The owner organization must be onboarded before repository
            // scans can be submitted.
            client.find_organization(owner).await?;

            let repo_id = repository_id(owner, repo_name);
            info!(%owner, repo = %repo_name, "creating repository scan");
            client
                .create_repository_scan(&repo_id, &config.check_types)
                .await
        }

        ScanScope::Organization => {
            let organization_id = match &config.organization_id {
                Some(id) => id.clone(),
                None => {
                    let Some(owner) = &ci_context.owner else {
                        return Err(PosturaError::Config {
                            message: "organization_id is required for organization scans"
                                .to_string(),
                        });
                    };
                    client.find_organization(owner).await?.id
                }
            };

            info!(%organization_id, "creating organization scan");
            client
                .create_organization_scan(
                    &organization_id,
                    &config.check_types,
                    &config.visibility_filter,
                )
                .await
        }

        ScanScope::Enterprise => {
            let Some(enterprise_id) = &config.enterprise_id else {
                return Err(PosturaError::Config {
                    message: "enterprise_id is required for enterprise scans".to_string(),
                });
            };

            info!(%enterprise_id, "creating enterprise scan");
            client
                .create_enterprise_scan(
                    enterprise_id,
                    &config.check_types,
                    &config.visibility_filter,
                )
                .await
        }
    }
}

/// Emits the report to stdout, the CI summary, step outputs, and the SARIF
/// file when requested.
fn report(
    config: &AppConfig,
    client: &PosturaClient,
    scan_id: &str,
    final_status: &ScanStatus,
    issues: &[postura_core::IssueInstance],
) -> Result<()> {
    let counts = severity_counts(issues);

    ci::set_output("status", final_status.status.as_str())?;
    ci::set_output("issues_found", &issues.len().to_string())?;
    ci::set_output("critical_issues", &counts.critical.to_string())?;
    ci::set_output("high_issues", &counts.high.to_string())?;
    ci::set_output("medium_issues", &counts.medium.to_string())?;
    ci::set_output("low_issues", &counts.low.to_string())?;
    ci::set_output("scan_url", &ci::scan_url(client.api_url(), scan_id))?;

    let formatted = format_scan_results(final_status, issues, config.output_format)?;
    ci::set_summary(&formatted)?;
    println!("{formatted}");

    if config.output_format == ReportFormat::Sarif {
        let sarif = SarifReport::from_issues(issues);
        std::fs::write(&config.sarif_file, serde_json::to_string_pretty(&sarif)?)?;
        ci::set_output("sarif_file", &config.sarif_file)?;
        info!(path = %config.sarif_file, "SARIF file generated");
    }

    Ok(())
}
