// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Suite-wide timeout enforcement.
//!
//! [`SuiteTimeoutGuard`] is a [`Plugin`] that limits the wall-clock time of
//! a whole session. Two strategies sit behind the [`Enforcer`] interface:
//!
//! - `deadline` (default): a watchdog arms at session start and aborts the
//!   session the moment the limit passes, interrupting the running test.
//! - `poll`: elapsed time is checked before each test. What happens next
//!   depends on [`TimeoutPolicy`].
//!
//! If the deadline timer can't be armed, the guard logs a warning, records
//! a diagnostic, and falls back to polling for that session.

pub mod alarm;
mod deadline;
mod polling;

use std::fmt;
use std::time::{Duration, Instant};

use serde::Deserialize;

pub use deadline::DeadlineEnforcer;
pub use polling::PollingEnforcer;

use crate::abort::{AbortHandle, SUITE_TIMEOUT_MESSAGE};
use crate::config::defaults;
use crate::error::Result;
use crate::hooks::{HookAction, ItemInfo, Plugin, SessionContext};
use crate::outcome::SessionSummary;

/// Message for tests failed after the deadline under [`TimeoutPolicy::FailRemaining`].
pub const REMAINING_FAILED_MESSAGE: &str =
    "Test suite exceeded timeout limit. All remaining tests are failed.";

/// How the deadline is detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Watchdog interrupt that preempts the running test.
    #[default]
    Deadline,
    /// Elapsed-time check before each test.
    Poll,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Deadline => "deadline",
            Strategy::Poll => "poll",
        })
    }
}

/// What the polling strategy does once the deadline has passed.
///
/// The deadline strategy always aborts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TimeoutPolicy {
    /// Stop the session before the next test.
    #[default]
    Abort,
    /// Keep going, but fail every remaining test without running it.
    FailRemaining,
}

impl fmt::Display for TimeoutPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeoutPolicy::Abort => "abort",
            TimeoutPolicy::FailRemaining => "fail-remaining",
        })
    }
}

/// Guard configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardSettings {
    /// Suite time limit; `None` or zero disables enforcement.
    pub timeout: Option<Duration>,
    pub strategy: Strategy,
    pub on_timeout: TimeoutPolicy,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(defaults::SUITE_TIMEOUT_SECS)),
            strategy: Strategy::default(),
            on_timeout: TimeoutPolicy::default(),
        }
    }
}

impl GuardSettings {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_policy(mut self, on_timeout: TimeoutPolicy) -> Self {
        self.on_timeout = on_timeout;
        self
    }

    /// The limit to enforce, if enforcement is enabled.
    pub fn effective_timeout(&self) -> Option<Duration> {
        self.timeout.filter(|t| !t.is_zero())
    }
}

/// Arms, checks, and disarms a suite deadline.
pub trait Enforcer: Send {
    fn kind(&self) -> Strategy;

    /// Start enforcing `timeout`. `abort` is the session's handle.
    fn arm(&mut self, timeout: Duration, abort: &AbortHandle) -> Result<()>;

    /// Stop enforcing. Safe to call when not armed.
    fn disarm(&mut self);

    fn deadline_passed(&self) -> bool;
}

/// Per-session timeout state.
#[derive(Debug, Clone)]
pub struct TimeoutSession {
    pub start_time: Instant,
    pub timeout: Option<Duration>,
    /// Set once the deadline has passed (polling with `fail-remaining`).
    pub exceeded: bool,
}

/// Plugin enforcing a wall-clock limit on an entire session.
pub struct SuiteTimeoutGuard {
    settings: GuardSettings,
    enforcer: Box<dyn Enforcer>,
    /// Polling stand-in for the current session when `enforcer` failed to arm.
    fallback: Option<PollingEnforcer>,
    session: Option<TimeoutSession>,
    abort: Option<AbortHandle>,
    warnings: Vec<String>,
}

impl SuiteTimeoutGuard {
    pub fn new(settings: GuardSettings) -> Self {
        let enforcer: Box<dyn Enforcer> = match settings.strategy {
            Strategy::Deadline => Box::new(DeadlineEnforcer::new()),
            Strategy::Poll => Box::new(PollingEnforcer::new()),
        };
        Self::with_enforcer(settings, enforcer)
    }

    /// Use a specific enforcer regardless of `settings.strategy`.
    pub fn with_enforcer(settings: GuardSettings, enforcer: Box<dyn Enforcer>) -> Self {
        Self {
            settings,
            enforcer,
            fallback: None,
            session: None,
            abort: None,
            warnings: Vec::new(),
        }
    }

    pub fn settings(&self) -> &GuardSettings {
        &self.settings
    }

    /// Strategy in effect, after any fallback.
    pub fn active_strategy(&self) -> Strategy {
        self.active().kind()
    }

    /// Current session state, between `session_start` and `session_finish`.
    pub fn session(&self) -> Option<&TimeoutSession> {
        self.session.as_ref()
    }

    fn active(&self) -> &dyn Enforcer {
        match &self.fallback {
            Some(polling) => polling,
            None => self.enforcer.as_ref(),
        }
    }

    fn disarm(&mut self) {
        self.enforcer.disarm();
        if let Some(mut polling) = self.fallback.take() {
            polling.disarm();
        }
    }

    /// Arm the configured enforcer, or poll for this session if it can't be armed.
    fn arm(&mut self, timeout: Duration, abort: &AbortHandle) {
        let Err(err) = self.enforcer.arm(timeout, abort) else {
            return;
        };
        tracing::warn!(error = %err, "suite deadline unavailable, checking between tests instead");
        self.warnings.push(format!(
            "{err}; suite timeout is checked between tests instead"
        ));
        self.enforcer.disarm();
        let mut polling = PollingEnforcer::new();
        if let Err(err) = polling.arm(timeout, abort) {
            tracing::warn!(error = %err, "suite timeout not enforced");
            self.warnings
                .push(format!("{err}; suite timeout is not enforced"));
        }
        self.fallback = Some(polling);
    }

    fn request_abort(&self) -> HookAction {
        if let Some(abort) = &self.abort {
            abort.request_timeout();
        }
        HookAction::Abort(SUITE_TIMEOUT_MESSAGE.to_string())
    }
}

impl Plugin for SuiteTimeoutGuard {
    fn name(&self) -> &'static str {
        "suite-timeout"
    }

    fn session_start(&mut self, ctx: &SessionContext) {
        // A second start without a finish re-arms instead of stacking.
        self.disarm();
        self.warnings.clear();

        let timeout = self.settings.effective_timeout();
        self.session = Some(TimeoutSession {
            start_time: ctx.started,
            timeout,
            exceeded: false,
        });
        self.abort = timeout.map(|_| ctx.abort.clone());

        if let Some(timeout) = timeout {
            tracing::debug!(
                ?timeout,
                strategy = %self.enforcer.kind(),
                "enforcing suite timeout"
            );
            self.arm(timeout, &ctx.abort);
        }
    }

    fn runtest_setup(&mut self, item: &ItemInfo) -> HookAction {
        let Some(session) = &self.session else {
            return HookAction::Continue;
        };
        if session.timeout.is_none() || !self.active().deadline_passed() {
            return HookAction::Continue;
        }

        let elapsed = session.start_time.elapsed();
        match (self.active().kind(), self.settings.on_timeout) {
            (Strategy::Poll, TimeoutPolicy::FailRemaining) => {
                if !session.exceeded {
                    tracing::warn!(item = %item.name, ?elapsed, "suite timeout exceeded, failing remaining tests");
                }
                if let Some(session) = &mut self.session {
                    session.exceeded = true;
                }
                HookAction::Continue
            }
            _ => {
                tracing::warn!(item = %item.name, ?elapsed, "suite timeout exceeded, aborting");
                self.request_abort()
            }
        }
    }

    fn runtest_call(&mut self, _item: &ItemInfo) -> HookAction {
        match &self.session {
            Some(session) if session.exceeded => {
                HookAction::TimedOut(REMAINING_FAILED_MESSAGE.to_string())
            }
            _ => HookAction::Continue,
        }
    }

    fn session_finish(&mut self, summary: &SessionSummary) {
        self.disarm();
        if summary.aborted.as_ref().is_some_and(|r| r.is_timeout()) {
            tracing::info!(
                completed = summary.completed,
                total = summary.total,
                "session ended by suite timeout"
            );
        }
        self.session = None;
        self.abort = None;
    }

    fn diagnostics(&self) -> Vec<String> {
        self.warnings.clone()
    }
}

impl Drop for SuiteTimeoutGuard {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
