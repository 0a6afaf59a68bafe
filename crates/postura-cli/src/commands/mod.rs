// SPDX-License-Identifier: Apache-2.0

//! Command handlers for the Postura CLI.

pub mod completion;
pub mod issues;
pub mod scan;
pub mod status;

use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use postura_core::AppConfig;

use crate::cli::{Commands, OutputContext};

/// Creates a styled spinner (only if interactive).
fn maybe_spinner(ctx: &OutputContext, message: &str) -> Option<ProgressBar> {
    if ctx.is_interactive() {
        let s = ProgressBar::new_spinner();
        s.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid spinner template"),
        );
        s.set_message(message.to_string());
        s.enable_steady_tick(Duration::from_millis(100));
        Some(s)
    } else {
        None
    }
}

/// Dispatch to the appropriate command handler.
pub async fn run(command: Commands, ctx: OutputContext, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Scan {
            scan_type,
            organization_id,
            enterprise_id,
            check_types,
            visibility,
            fail_on_issues,
            severity_threshold,
            no_wait,
            timeout,
        } => {
            // Flags win over environment/file configuration.
            let mut config = config.clone();
            if let Some(scan_type) = scan_type {
                config.scan_type = scan_type.into();
            }
            if let Some(id) = organization_id {
                config.organization_id = Some(id);
            }
            if let Some(id) = enterprise_id {
                config.enterprise_id = Some(id);
            }
            if let Some(types) = check_types {
                config.check_types = types;
            }
            if let Some(visibility) = visibility {
                config.visibility_filter = visibility;
            }
            if fail_on_issues {
                config.fail_on_issues = true;
            }
            if let Some(threshold) = severity_threshold {
                config.severity_threshold = threshold.into();
            }
            if no_wait {
                config.wait_for_completion = false;
            }
            if let Some(minutes) = timeout {
                config.timeout_minutes = minutes;
            }

            scan::run(&ctx, &config).await
        }

        Commands::Status { scan_id } => status::run(&ctx, config, &scan_id).await,

        Commands::Issues { scan_id } => issues::run(&ctx, config, &scan_id).await,

        Commands::Completion { shell } => completion::run_generate(shell),
    }
}
