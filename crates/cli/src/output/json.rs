// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON output formatter.
//!
//! JSON is buffered and written at the end (not streamed).

use std::io::Write;

use chrono::Utc;
use serde::Serialize;

use super::abort_banner;
use crate::outcome::SessionReport;

/// Top-level JSON document.
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    pub timestamp: String,
    pub passed: bool,
    /// Human-readable reason the run ended early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(flatten)]
    pub report: &'a SessionReport,
}

/// Wrap a report with the current timestamp.
pub fn create_output(report: &SessionReport) -> JsonOutput<'_> {
    JsonOutput {
        timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        passed: report.passed(),
        banner: abort_banner(report),
        report,
    }
}

/// JSON output formatter.
pub struct JsonFormatter<W: Write> {
    writer: W,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write the complete JSON output.
    pub fn write(&mut self, report: &SessionReport) -> std::io::Result<()> {
        let json =
            serde_json::to_string_pretty(&create_output(report)).map_err(std::io::Error::other)?;
        writeln!(self.writer, "{}", json)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
