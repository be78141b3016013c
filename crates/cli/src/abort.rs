// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session-wide abort requests.
//!
//! An [`AbortHandle`] is the only thing the deadline watchdog touches. A
//! timeout request is a single atomic store, so it is safe from any thread
//! at any point during a test.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use serde::Serialize;

/// Top-level message shown when the suite runs past its limit.
pub const SUITE_TIMEOUT_MESSAGE: &str = "Test suite exceeded timeout limit. Aborting test run.";

const NONE: u8 = 0;
const SUITE_TIMEOUT: u8 = 1;
const PLUGIN: u8 = 2;

/// Why a session was aborted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum AbortReason {
    /// The suite-wide deadline passed.
    SuiteTimeout,
    /// A plugin requested the abort.
    Plugin(String),
}

impl AbortReason {
    pub fn is_timeout(&self) -> bool {
        matches!(self, AbortReason::SuiteTimeout)
    }

    pub fn message(&self) -> &str {
        match self {
            AbortReason::SuiteTimeout => SUITE_TIMEOUT_MESSAGE,
            AbortReason::Plugin(msg) => msg,
        }
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Default)]
struct AbortState {
    code: AtomicU8,
    message: OnceLock<String>,
}

/// Shared, cloneable abort flag for one session.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    state: Arc<AbortState>,
}

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a suite-timeout abort.
    ///
    /// Does no allocation, locking, or I/O. The first request wins.
    pub fn request_timeout(&self) {
        let _ = self.state.code.compare_exchange(
            NONE,
            SUITE_TIMEOUT,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }

    /// Request an abort on behalf of a plugin. The first request wins.
    pub fn request(&self, reason: AbortReason) {
        match reason {
            AbortReason::SuiteTimeout => self.request_timeout(),
            AbortReason::Plugin(message) => {
                if self
                    .state
                    .code
                    .compare_exchange(NONE, PLUGIN, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
                {
                    let _ = self.state.message.set(message);
                }
            }
        }
    }

    /// Whether any abort has been requested.
    pub fn is_requested(&self) -> bool {
        self.state.code.load(Ordering::SeqCst) != NONE
    }

    /// The pending abort reason, if any.
    pub fn reason(&self) -> Option<AbortReason> {
        match self.state.code.load(Ordering::SeqCst) {
            SUITE_TIMEOUT => Some(AbortReason::SuiteTimeout),
            PLUGIN => Some(AbortReason::Plugin(
                self.state
                    .message
                    .get()
                    .cloned()
                    .unwrap_or_else(|| "aborted by plugin".to_string()),
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "abort_tests.rs"]
mod tests;
