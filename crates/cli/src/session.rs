// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential test session with plugin hooks.
//!
//! Items run one at a time on the calling thread. Plugins observe the
//! lifecycle and may fail individual items or abort the whole run.
//! `session_finish` is dispatched exactly once on every path.

use std::time::{Duration, Instant};

use globset::Glob;

use crate::abort::{AbortHandle, AbortReason};
use crate::error::{Error, Result};
use crate::hooks::{HookAction, ItemInfo, Plugin, SessionContext};
use crate::item::{ItemContext, ItemResult, TestItem};
use crate::outcome::{SessionReport, SessionSummary, TestOutcome, TestStatus};

/// A single test-suite run.
pub struct Session {
    items: Vec<Box<dyn TestItem>>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl Session {
    pub fn new(items: Vec<Box<dyn TestItem>>) -> Self {
        Self {
            items,
            plugins: Vec::new(),
        }
    }

    /// Register a plugin. Hooks run in registration order.
    pub fn with_plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Keep only items whose name matches a glob pattern.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self> {
        let matcher = Glob::new(pattern)
            .map_err(|e| Error::Argument(format!("invalid filter `{pattern}`: {e}")))?
            .compile_matcher();
        self.items.retain(|item| matcher.is_match(item.name()));
        Ok(self)
    }

    pub fn item_names(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.name()).collect()
    }

    /// Run every item and return the report.
    pub fn run(&mut self) -> SessionReport {
        let started = Instant::now();
        let abort = AbortHandle::new();
        let ctx = SessionContext {
            started,
            abort: abort.clone(),
        };

        tracing::debug!(items = self.items.len(), "session start");
        for plugin in &mut self.plugins {
            plugin.session_start(&ctx);
        }

        let infos: Vec<ItemInfo> = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| ItemInfo {
                name: item.name().to_string(),
                index,
            })
            .collect();
        for plugin in &mut self.plugins {
            plugin.collection_finish(&infos);
        }

        let mut tests = Vec::with_capacity(self.items.len());
        for (item, info) in self.items.iter().zip(&infos) {
            if abort.is_requested() {
                break;
            }

            let action = dispatch(&mut self.plugins, |p| p.runtest_setup(info))
                .or_else(|| dispatch(&mut self.plugins, |p| p.runtest_call(info)));
            match action {
                None | Some(HookAction::Continue) => {}
                Some(HookAction::Abort(reason)) => {
                    tracing::info!(item = %info.name, %reason, "session aborted by plugin");
                    abort.request(AbortReason::Plugin(reason));
                    break;
                }
                Some(HookAction::Fail(message)) => {
                    tests.push(TestOutcome::failed(&info.name, Duration::ZERO, message));
                    continue;
                }
                Some(HookAction::TimedOut(message)) => {
                    tests.push(TestOutcome::timed_out(&info.name, message));
                    continue;
                }
            }

            tests.push(run_item(item.as_ref(), &abort));
        }

        let not_run = infos[tests.len()..]
            .iter()
            .map(|info| info.name.clone())
            .collect();
        let aborted = abort.reason();
        let timed_out = aborted.as_ref().is_some_and(AbortReason::is_timeout)
            || tests.iter().any(|t| t.status == TestStatus::TimedOut);
        let duration = started.elapsed();

        let summary = SessionSummary {
            total: infos.len(),
            completed: tests.len(),
            aborted: aborted.clone(),
            duration,
        };
        tracing::debug!(
            completed = summary.completed,
            total = summary.total,
            aborted = aborted.is_some(),
            "session finish"
        );
        for plugin in &mut self.plugins {
            plugin.session_finish(&summary);
        }

        SessionReport {
            tests,
            not_run,
            aborted,
            timed_out,
            duration,
            warnings: self.plugins.iter().flat_map(|p| p.diagnostics()).collect(),
        }
    }
}

/// Call a hook on each plugin until one returns something other than `Continue`.
fn dispatch<F>(plugins: &mut [Box<dyn Plugin>], mut hook: F) -> Option<HookAction>
where
    F: FnMut(&mut dyn Plugin) -> HookAction,
{
    plugins
        .iter_mut()
        .map(|plugin| hook(plugin.as_mut()))
        .find(|action| *action != HookAction::Continue)
}

fn run_item(item: &dyn TestItem, abort: &AbortHandle) -> TestOutcome {
    let ctx = ItemContext::new(abort.clone());
    let result = item.run(&ctx);
    let duration = ctx.elapsed();

    // Anything that finished after an abort request was cut short.
    if let Some(reason) = abort.reason() {
        return TestOutcome::interrupted(item.name(), duration, &reason);
    }
    match result {
        ItemResult::Passed => TestOutcome::passed(item.name(), duration),
        ItemResult::Failed(message) => TestOutcome::failed(item.name(), duration, message),
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
