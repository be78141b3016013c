// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run command implementation.

use curfew::cli::{Cli, OutputFormat, RunArgs};
use curfew::color::resolve_color_with_flags;
use curfew::config;
use curfew::discovery;
use curfew::error::ExitCode;
use curfew::guard::{Strategy, SuiteTimeoutGuard, TimeoutPolicy};
use curfew::output::FormatOptions;
use curfew::output::json::JsonFormatter;
use curfew::output::text::TextFormatter;
use curfew::session::Session;

/// Run the configured test suite under the suite timeout guard.
pub fn run(cli: &Cli, args: &RunArgs) -> anyhow::Result<ExitCode> {
    if args.color && args.no_color {
        eprintln!("--color and --no-color cannot be used together");
        return Ok(ExitCode::ConfigError);
    }

    let cwd = std::env::current_dir()?;
    let Some(config_path) = discovery::resolve_config(cli.config.as_deref(), &cwd)? else {
        eprintln!("no curfew.toml found in {} or its parents", cwd.display());
        eprintln!("  Run `curfew init` to create one.");
        return Ok(ExitCode::ConfigError);
    };

    let config_path = cwd.join(config_path);

    tracing::debug!("loading config from {}", config_path.display());
    let config = config::load(&config_path)?;
    let base_dir = config_path.parent().unwrap_or(&cwd).to_path_buf();

    let settings = args.apply(config.guard_settings());
    if settings.strategy == Strategy::Deadline
        && settings.on_timeout == TimeoutPolicy::FailRemaining
    {
        eprintln!("curfew: warning: on_timeout = \"fail-remaining\" only applies to the poll strategy");
    }
    tracing::debug!(
        timeout = ?settings.effective_timeout(),
        strategy = %settings.strategy,
        on_timeout = %settings.on_timeout,
        "suite timeout settings"
    );

    let mut session = Session::new(config.items(&base_dir));
    if let Some(pattern) = &args.filter {
        session = session.with_filter(pattern)?;
    }
    tracing::debug!(tests = ?session.item_names(), "collected tests");
    let mut session = session.with_plugin(SuiteTimeoutGuard::new(settings));

    tracing::trace!("run command starting");
    let report = session.run();

    match args.output {
        OutputFormat::Text => {
            let options = FormatOptions {
                verbose: args.verbose,
            };
            let color = resolve_color_with_flags(args.color, args.no_color);
            let mut formatter = TextFormatter::stdout(color, options);
            formatter.write_report(&report)?;
        }
        OutputFormat::Json => {
            let mut formatter = JsonFormatter::new(std::io::stdout());
            formatter.write(&report)?;
        }
    }

    Ok(ExitCode::from(&report))
}
