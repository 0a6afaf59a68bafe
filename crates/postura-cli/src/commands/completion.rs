// SPDX-License-Identifier: Apache-2.0

//! Shell completion generation.

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::Cli;

/// Generates a completion script for the given shell to stdout.
pub fn run_generate(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "postura", &mut std::io::stdout());
    Ok(())
}
