// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing with clap derive.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::config::duration::parse_timeout;
use crate::guard::{GuardSettings, Strategy, TimeoutPolicy};

/// A sequential test runner that enforces a wall-clock limit on the whole suite
#[derive(Parser)]
#[command(name = "curfew")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Use specific config file
    #[arg(short = 'C', long = "config", global = true, env = "CURFEW_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the configured test suite
    Run(RunArgs),
    /// Create a starter curfew.toml
    Init(InitArgs),
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Time limit for the entire suite: seconds, or 30s/15m/2h (0 disables)
    #[arg(
        long,
        value_name = "SECONDS",
        value_parser = parse_suite_timeout,
        allow_hyphen_values = true
    )]
    pub suite_timeout: Option<Duration>,

    /// How the suite deadline is enforced
    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,

    /// What polling does once the deadline passes
    #[arg(long, value_enum)]
    pub on_timeout: Option<TimeoutPolicy>,

    /// Only run tests whose name matches this glob
    #[arg(long, value_name = "GLOB")]
    pub filter: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,

    /// Force color output
    #[arg(long)]
    pub color: bool,

    /// Disable color output
    #[arg(long)]
    pub no_color: bool,

    /// List passing tests too
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl RunArgs {
    /// Apply command-line overrides on top of config-file settings.
    pub fn apply(&self, settings: GuardSettings) -> GuardSettings {
        GuardSettings {
            timeout: self.suite_timeout.or(settings.timeout),
            strategy: self.strategy.unwrap_or(settings.strategy),
            on_timeout: self.on_timeout.unwrap_or(settings.on_timeout),
        }
    }
}

fn parse_suite_timeout(s: &str) -> Result<Duration, String> {
    parse_timeout(s)
}

#[derive(clap::Args)]
pub struct InitArgs {
    /// Overwrite existing config
    #[arg(long)]
    pub force: bool,
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
