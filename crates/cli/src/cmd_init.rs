// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Implementation of the `curfew init` command.

use std::path::Path;

use anyhow::Result;

use crate::cli::InitArgs;
use crate::config::defaults::{CONFIG_FILE_NAME, STARTER_CONFIG};
use crate::error::ExitCode;

/// Run the `init` command in the current directory.
pub fn run(args: &InitArgs) -> Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    init_in(&cwd, args)
}

/// Write a starter curfew.toml into `dir`.
pub fn init_in(dir: &Path, args: &InitArgs) -> Result<ExitCode> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !args.force {
        eprintln!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
        return Ok(ExitCode::ConfigError);
    }

    std::fs::write(&config_path, STARTER_CONFIG)?;
    tracing::debug!(path = %config_path.display(), "wrote starter config");
    println!("Created {CONFIG_FILE_NAME}");
    Ok(ExitCode::Success)
}

#[cfg(test)]
#[path = "cmd_init_tests.rs"]
mod tests;
