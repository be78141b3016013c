//! Shared unit test utilities.
//!
//! Provides common helpers for unit tests in the cli crate.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tempfile::TempDir;

use crate::abort::AbortHandle;
use crate::hooks::{HookAction, ItemInfo, Plugin, SessionContext};
use crate::item::{FnItem, TestItem};
use crate::outcome::SessionSummary;

/// Serializes tests that arm the process-wide deadline alarm.
pub fn alarm_lock() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Creates a temp directory with a minimal curfew.toml.
pub fn temp_project() -> TempDir {
    temp_project_with_config("version = 1\n")
}

/// Creates a temp directory with custom config content.
pub fn temp_project_with_config(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("curfew.toml"), config).unwrap();
    dir
}

/// A boxed item that sleeps and then passes.
pub fn sleeper(name: &str, millis: u64) -> Box<dyn TestItem> {
    Box::new(FnItem::new(name, move |_| {
        std::thread::sleep(Duration::from_millis(millis));
        Ok(())
    }))
}

/// A boxed item that sleeps in small steps, stopping at abort checkpoints.
pub fn cooperative_sleeper(name: &str, millis: u64) -> Box<dyn TestItem> {
    Box::new(FnItem::new(name, move |ctx| {
        while ctx.elapsed() < Duration::from_millis(millis) {
            ctx.checkpoint()?;
            std::thread::sleep(Duration::from_millis(5));
        }
        Ok(())
    }))
}

/// Plugin that records every hook call and replays scripted actions.
#[derive(Default)]
pub struct RecordingPlugin {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub abort: Arc<Mutex<Option<AbortHandle>>>,
    setup_actions: Vec<(String, HookAction)>,
    call_actions: Vec<(String, HookAction)>,
}

impl RecordingPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `action` from `runtest_setup` for the named item.
    pub fn on_setup(mut self, item: &str, action: HookAction) -> Self {
        self.setup_actions.push((item.to_string(), action));
        self
    }

    /// Return `action` from `runtest_call` for the named item.
    pub fn on_call(mut self, item: &str, action: HookAction) -> Self {
        self.call_actions.push((item.to_string(), action));
        self
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn scripted(actions: &[(String, HookAction)], item: &ItemInfo) -> HookAction {
    actions
        .iter()
        .find(|(name, _)| *name == item.name)
        .map(|(_, action)| action.clone())
        .unwrap_or(HookAction::Continue)
}

impl Plugin for RecordingPlugin {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn session_start(&mut self, ctx: &SessionContext) {
        *self.abort.lock().unwrap() = Some(ctx.abort.clone());
        self.record("session_start".into());
    }

    fn collection_finish(&mut self, items: &[ItemInfo]) {
        self.record(format!("collection_finish:{}", items.len()));
    }

    fn runtest_setup(&mut self, item: &ItemInfo) -> HookAction {
        self.record(format!("setup:{}", item.name));
        scripted(&self.setup_actions, item)
    }

    fn runtest_call(&mut self, item: &ItemInfo) -> HookAction {
        self.record(format!("call:{}", item.name));
        scripted(&self.call_actions, item)
    }

    fn session_finish(&mut self, summary: &SessionSummary) {
        self.record(format!("session_finish:{}/{}", summary.completed, summary.total));
    }
}
