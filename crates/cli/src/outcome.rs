// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test and session result types.

use std::time::Duration;

use serde::Serialize;

use crate::abort::AbortReason;
use crate::error::ExitCode;

/// Final status of a single test item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
    /// Failed without running because the suite deadline had passed.
    TimedOut,
    /// Killed mid-run because the session was aborted.
    Interrupted,
}

impl TestStatus {
    /// Label used in text output.
    pub fn label(self) -> &'static str {
        match self {
            TestStatus::Passed => "PASS",
            TestStatus::Failed => "FAIL",
            TestStatus::TimedOut => "TIMEOUT",
            TestStatus::Interrupted => "INTERRUPTED",
        }
    }
}

/// Result of running a single test.
#[derive(Debug, Clone, Serialize)]
pub struct TestOutcome {
    /// Test name.
    pub name: String,
    pub status: TestStatus,
    /// Test duration.
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
    /// Failure or interruption message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TestOutcome {
    /// Create a passing test outcome.
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            duration,
            message: None,
        }
    }

    /// Create a failing test outcome.
    pub fn failed(name: impl Into<String>, duration: Duration, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            duration,
            message: Some(message.into()),
        }
    }

    /// Create an outcome failed by the suite deadline.
    pub fn timed_out(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::TimedOut,
            duration: Duration::ZERO,
            message: Some(message.into()),
        }
    }

    /// Create an outcome for a test cut short by a session abort.
    pub fn interrupted(
        name: impl Into<String>,
        duration: Duration,
        reason: &AbortReason,
    ) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Interrupted,
            duration,
            message: Some(format!("interrupted: {reason}")),
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == TestStatus::Passed
    }
}

/// Snapshot handed to plugins when a session finishes.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub total: usize,
    pub completed: usize,
    pub aborted: Option<AbortReason>,
    pub duration: Duration,
}

/// Result of running an entire session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionReport {
    /// Outcomes of every item that reached execution, in run order.
    pub tests: Vec<TestOutcome>,
    /// Items never started because the session was aborted.
    pub not_run: Vec<String>,
    /// Abort reason, if the session ended early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<AbortReason>,
    /// Whether the suite-wide deadline was exceeded.
    pub timed_out: bool,
    /// Total wall-clock time.
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
    /// Plugin diagnostics (e.g. a degraded timer).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl SessionReport {
    /// True when the session ran to completion and every test passed.
    pub fn passed(&self) -> bool {
        self.aborted.is_none() && !self.timed_out && self.tests.iter().all(TestOutcome::is_passed)
    }

    /// Get count of tests with the given status.
    pub fn count(&self, status: TestStatus) -> usize {
        self.tests.iter().filter(|t| t.status == status).count()
    }

    /// Get count of passed tests.
    pub fn passed_count(&self) -> usize {
        self.count(TestStatus::Passed)
    }

    /// Get count of tests that did not pass.
    pub fn failed_count(&self) -> usize {
        self.tests.len() - self.passed_count()
    }

    /// Get slowest test.
    pub fn slowest_test(&self) -> Option<&TestOutcome> {
        self.tests.iter().max_by_key(|t| t.duration)
    }
}

impl From<&SessionReport> for ExitCode {
    fn from(report: &SessionReport) -> Self {
        if report.aborted.is_some() || report.timed_out {
            ExitCode::Aborted
        } else if report.passed() {
            ExitCode::Success
        } else {
            ExitCode::TestsFailed
        }
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
