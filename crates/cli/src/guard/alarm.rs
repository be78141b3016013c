// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The process-wide suite deadline.
//!
//! There is exactly one alarm per process. It is a named watchdog thread
//! that waits on a cancel channel and a deadline timer; on expiry it makes a
//! single atomic store on the session's [`AbortHandle`] and exits.
//!
//! Arming while an alarm is already armed replaces it: the previous watchdog
//! is cancelled and joined before the new one starts.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Sender, after, bounded, select};

use crate::abort::AbortHandle;
use crate::error::{Error, Result};

/// Name of the watchdog thread.
pub const WATCHDOG_THREAD_NAME: &str = "curfew-deadline";

static ALARM: Mutex<Option<Armed>> = Mutex::new(None);
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

struct Armed {
    id: u64,
    cancel: Sender<()>,
    watchdog: JoinHandle<()>,
}

impl Armed {
    /// Cancel the watchdog and wait for it to exit.
    fn stop(self) {
        drop(self.cancel);
        if self.watchdog.join().is_err() {
            tracing::warn!(id = self.id, "deadline watchdog panicked");
        }
    }
}

/// Ownership of one arming of the alarm. Dropping it disarms.
#[derive(Debug)]
pub struct AlarmHandle {
    id: u64,
    deadline: Option<Instant>,
}

impl AlarmHandle {
    /// Time left before the deadline, saturating at zero.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Whether the deadline has passed.
    pub fn expired(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }
}

impl Drop for AlarmHandle {
    fn drop(&mut self) {
        disarm(self);
    }
}

fn slot() -> MutexGuard<'static, Option<Armed>> {
    ALARM.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Arm the alarm to call `abort.request_timeout()` after `timeout`.
///
/// Replaces any alarm that is still armed.
pub fn arm(timeout: Duration, abort: AbortHandle) -> Result<AlarmHandle> {
    let mut slot = slot();
    if let Some(previous) = slot.take() {
        tracing::debug!(id = previous.id, "replacing armed suite deadline");
        previous.stop();
    }

    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let (cancel, cancelled) = bounded::<()>(0);
    let watchdog = std::thread::Builder::new()
        .name(WATCHDOG_THREAD_NAME.to_string())
        .spawn(move || {
            select! {
                // Fires on disconnect when the sender is dropped.
                recv(cancelled) -> _ => {},
                recv(after(timeout)) -> _ => abort.request_timeout(),
            }
        })
        .map_err(|e| Error::TimerUnavailable(format!("cannot spawn watchdog thread: {e}")))?;

    tracing::debug!(id, ?timeout, "armed suite deadline");
    *slot = Some(Armed {
        id,
        cancel,
        watchdog,
    });

    Ok(AlarmHandle {
        id,
        deadline: Instant::now().checked_add(timeout),
    })
}

/// Disarm the alarm if `handle` still owns it.
///
/// Returns false when the handle was already disarmed or replaced.
pub fn disarm(handle: &AlarmHandle) -> bool {
    let mut slot = slot();
    match slot.take() {
        Some(armed) if armed.id == handle.id => {
            tracing::debug!(id = armed.id, "disarmed suite deadline");
            armed.stop();
            true
        }
        other => {
            *slot = other;
            false
        }
    }
}

/// Whether an alarm is armed and not yet disarmed.
///
/// An alarm that already fired stays armed until its handle disarms it.
pub fn is_armed() -> bool {
    slot().is_some()
}

#[cfg(test)]
#[path = "alarm_tests.rs"]
mod tests;
