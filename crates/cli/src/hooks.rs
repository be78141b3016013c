// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Plugin hooks dispatched by a [`Session`](crate::session::Session).

use std::time::Instant;

use crate::abort::AbortHandle;
use crate::outcome::SessionSummary;

/// Information about a collected test item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInfo {
    pub name: String,
    /// Position in run order (0-based).
    pub index: usize,
}

/// What a plugin wants done with the current item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookAction {
    /// Proceed normally.
    Continue,
    /// Mark the item failed with this message and skip its body.
    Fail(String),
    /// Mark the item failed by the suite deadline and skip its body.
    TimedOut(String),
    /// Abort the whole session with this reason.
    Abort(String),
}

/// Session state shared with plugins at session start.
pub struct SessionContext {
    pub started: Instant,
    /// Abort handle for this session; plugins may clone it.
    pub abort: AbortHandle,
}

/// A passive subscriber to the session lifecycle.
///
/// Every hook has a no-op default so plugins only implement what they use.
pub trait Plugin: Send {
    /// Identifier for logging.
    fn name(&self) -> &'static str;

    fn session_start(&mut self, _ctx: &SessionContext) {}

    fn collection_finish(&mut self, _items: &[ItemInfo]) {}

    /// Called before each item, after the previous one finished.
    fn runtest_setup(&mut self, _item: &ItemInfo) -> HookAction {
        HookAction::Continue
    }

    /// Called right before an item's body runs.
    fn runtest_call(&mut self, _item: &ItemInfo) -> HookAction {
        HookAction::Continue
    }

    /// Always called once, however the session ended.
    fn session_finish(&mut self, _summary: &SessionSummary) {}

    /// Warnings to surface in the session report.
    fn diagnostics(&self) -> Vec<String> {
        Vec::new()
    }
}
