// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deadline checks between test items.

use std::time::{Duration, Instant};

use super::{Enforcer, Strategy};
use crate::abort::AbortHandle;
use crate::error::Result;

/// Compares elapsed time against the limit whenever asked.
///
/// Never interrupts a running test; the guard consults it before each item.
#[derive(Debug, Default)]
pub struct PollingEnforcer {
    start: Option<Instant>,
    timeout: Option<Duration>,
}

impl PollingEnforcer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Enforcer for PollingEnforcer {
    fn kind(&self) -> Strategy {
        Strategy::Poll
    }

    fn arm(&mut self, timeout: Duration, _abort: &AbortHandle) -> Result<()> {
        self.start = Some(Instant::now());
        self.timeout = Some(timeout);
        Ok(())
    }

    fn disarm(&mut self) {
        self.start = None;
        self.timeout = None;
    }

    fn deadline_passed(&self) -> bool {
        match (self.start, self.timeout) {
            (Some(start), Some(timeout)) => start.elapsed() > timeout,
            _ => false,
        }
    }
}
