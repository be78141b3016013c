// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text output formatter.
//!
//! ```text
//! FAIL  <test> (<duration>)
//!     <message>
//! NOT RUN  <test>
//! <passed> passed, <failed> failed, <n> not run in <duration>
//! curfew: <abort banner>
//! ```

use std::time::Duration;

use termcolor::{ColorChoice, StandardStream, WriteColor};

use super::{FormatOptions, abort_banner};
use crate::color::scheme;
use crate::outcome::{SessionReport, TestOutcome, TestStatus};

/// Text output formatter with color support.
pub struct TextFormatter<W: WriteColor> {
    out: W,
    options: FormatOptions,
}

impl TextFormatter<StandardStream> {
    /// Create a formatter writing to stdout.
    pub fn stdout(color_choice: ColorChoice, options: FormatOptions) -> Self {
        Self::new(StandardStream::stdout(color_choice), options)
    }
}

impl<W: WriteColor> TextFormatter<W> {
    pub fn new(out: W, options: FormatOptions) -> Self {
        Self { out, options }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write the full report.
    pub fn write_report(&mut self, report: &SessionReport) -> std::io::Result<()> {
        for test in &report.tests {
            self.write_test(test)?;
        }
        for name in &report.not_run {
            self.out.set_color(&scheme::skip())?;
            write!(self.out, "NOT RUN")?;
            self.out.reset()?;
            writeln!(self.out, "  {name}")?;
        }
        for warning in &report.warnings {
            self.out.set_color(&scheme::warn())?;
            write!(self.out, "warning")?;
            self.out.reset()?;
            writeln!(self.out, ": {warning}")?;
        }
        self.write_summary(report)?;
        self.write_banner(report)
    }

    /// Write a single test line; passing tests only in verbose mode.
    pub fn write_test(&mut self, test: &TestOutcome) -> std::io::Result<()> {
        if test.is_passed() && !self.options.verbose {
            return Ok(());
        }

        self.out.set_color(&scheme::status(test.status))?;
        write!(self.out, "{}", test.status.label())?;
        self.out.reset()?;
        write!(self.out, "  ")?;

        self.out.set_color(&scheme::test_name())?;
        write!(self.out, "{}", test.name)?;
        self.out.reset()?;
        if test.status != TestStatus::TimedOut {
            write!(self.out, " ({})", format_duration(test.duration))?;
        }
        writeln!(self.out)?;

        if let Some(message) = &test.message {
            self.out.set_color(&scheme::message())?;
            for line in message.lines() {
                writeln!(self.out, "    {line}")?;
            }
            self.out.reset()?;
        }
        Ok(())
    }

    /// Write the summary line.
    pub fn write_summary(&mut self, report: &SessionReport) -> std::io::Result<()> {
        let mut parts = vec![format!("{} passed", report.passed_count())];
        let failed = report.count(TestStatus::Failed);
        if failed > 0 {
            parts.push(format!("{failed} failed"));
        }
        let timed_out = report.count(TestStatus::TimedOut) + report.count(TestStatus::Interrupted);
        if timed_out > 0 {
            parts.push(format!("{timed_out} timed out"));
        }
        if !report.not_run.is_empty() {
            parts.push(format!("{} not run", report.not_run.len()));
        }
        writeln!(
            self.out,
            "{} in {}",
            parts.join(", "),
            format_duration(report.duration)
        )?;

        if self.options.verbose
            && let Some(slowest) = report.slowest_test()
        {
            writeln!(
                self.out,
                "slowest: {} ({})",
                slowest.name,
                format_duration(slowest.duration)
            )?;
        }
        Ok(())
    }

    fn write_banner(&mut self, report: &SessionReport) -> std::io::Result<()> {
        let Some(banner) = abort_banner(report) else {
            return Ok(());
        };
        self.out.set_color(&scheme::banner())?;
        writeln!(self.out, "curfew: {banner}")?;
        self.out.reset()
    }
}

/// Format a duration as seconds with two decimals.
pub fn format_duration(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f64())
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
