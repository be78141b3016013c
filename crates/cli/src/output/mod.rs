// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for session reports.

pub mod json;
pub mod text;

use crate::abort::{AbortReason, SUITE_TIMEOUT_MESSAGE};
use crate::guard::REMAINING_FAILED_MESSAGE;
use crate::outcome::SessionReport;

/// Output formatting options.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Also list passing tests.
    pub verbose: bool,
}

impl FormatOptions {
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

/// Top-level line explaining why the run ended early, if it did.
pub fn abort_banner(report: &SessionReport) -> Option<String> {
    match &report.aborted {
        Some(AbortReason::SuiteTimeout) => Some(SUITE_TIMEOUT_MESSAGE.to_string()),
        Some(AbortReason::Plugin(message)) => Some(format!("Test run aborted: {message}")),
        None if report.timed_out => Some(REMAINING_FAILED_MESSAGE.to_string()),
        None => None,
    }
}
