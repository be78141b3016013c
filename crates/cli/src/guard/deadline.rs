// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deadline interrupt backed by the process alarm.

use std::time::Duration;

use super::alarm::{self, AlarmHandle};
use super::{Enforcer, Strategy};
use crate::abort::AbortHandle;
use crate::error::Result;

/// Arms the process-wide alarm so the deadline preempts the running test.
#[derive(Debug, Default)]
pub struct DeadlineEnforcer {
    alarm: Option<AlarmHandle>,
}

impl DeadlineEnforcer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Enforcer for DeadlineEnforcer {
    fn kind(&self) -> Strategy {
        Strategy::Deadline
    }

    fn arm(&mut self, timeout: Duration, abort: &AbortHandle) -> Result<()> {
        self.disarm();
        self.alarm = Some(alarm::arm(timeout, abort.clone())?);
        Ok(())
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.alarm.take() {
            alarm::disarm(&handle);
        }
    }

    fn deadline_passed(&self) -> bool {
        self.alarm.as_ref().is_some_and(AlarmHandle::expired)
    }
}
