// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized default values for configuration.

/// Config file name searched for during discovery.
pub const CONFIG_FILE_NAME: &str = "curfew.toml";

/// Default suite time limit in seconds (15 minutes).
pub const SUITE_TIMEOUT_SECS: u64 = 900;

/// Starter config written by `curfew init`.
pub const STARTER_CONFIG: &str = r#"version = 1

[suite]
# Wall-clock limit for the whole run: seconds or "30s", "15m", "2h". 0 disables.
timeout = 900
# "deadline" interrupts the running test; "poll" checks between tests.
strategy = "deadline"
# With strategy = "poll": "abort" stops the run, "fail-remaining" fails what's left.
on_timeout = "abort"

[[test]]
name = "example"
run = "echo replace me with a real test command"
"#;
