// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test items: the units of work a session runs.
//!
//! Items check the session's abort flag while they run so that a deadline
//! can cut them short instead of waiting for the next item boundary.

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::abort::AbortHandle;

/// How often a running command is polled for exit or abort.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Number of stderr lines kept in a failure message.
const STDERR_TAIL_LINES: usize = 5;

/// Result of an item body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemResult {
    Passed,
    Failed(String),
}

/// Per-item view of the session, passed to [`TestItem::run`].
pub struct ItemContext {
    abort: AbortHandle,
    started: Instant,
}

impl ItemContext {
    pub fn new(abort: AbortHandle) -> Self {
        Self {
            abort,
            started: Instant::now(),
        }
    }

    /// Whether the session has been asked to stop.
    pub fn is_aborted(&self) -> bool {
        self.abort.is_requested()
    }

    /// Cooperative cancellation point for in-process items.
    pub fn checkpoint(&self) -> Result<(), String> {
        match self.abort.reason() {
            Some(reason) => Err(reason.to_string()),
            None => Ok(()),
        }
    }

    /// Time since this item started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// A single runnable test.
pub trait TestItem: Send {
    fn name(&self) -> &str;

    /// Run the test body to completion or until the session aborts.
    fn run(&self, ctx: &ItemContext) -> ItemResult;
}

// =============================================================================
// Shell command items
// =============================================================================

/// A test that runs a shell command; exit status 0 passes.
#[derive(Debug, Clone)]
pub struct CommandItem {
    name: String,
    command: String,
    cwd: Option<PathBuf>,
    env: BTreeMap<String, String>,
}

impl CommandItem {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            cwd: None,
            env: BTreeMap::new(),
        }
    }

    /// Run the command in this directory.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Add environment variables for the command.
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env.extend(env);
        self
    }

    fn spawn(&self) -> io::Result<Child> {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", self.command.as_str()]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", self.command.as_str()]);
            cmd
        };
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        // Own process group, so an abort can take down everything the test started.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        cmd.envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
    }
}

impl TestItem for CommandItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: &ItemContext) -> ItemResult {
        let child = match self.spawn() {
            Ok(child) => child,
            Err(e) => return ItemResult::Failed(format!("failed to execute `{}`: {e}", self.command)),
        };

        match wait_or_abort(child, &ctx.abort) {
            Ok(Finished::Exited { status, .. }) if status.success() => ItemResult::Passed,
            Ok(Finished::Exited { status, stderr }) => {
                ItemResult::Failed(format_exit_failure(status, &stderr))
            }
            Ok(Finished::Killed) => ItemResult::Failed("killed by session abort".to_string()),
            Err(e) => ItemResult::Failed(format!("failed to wait for `{}`: {e}", self.command)),
        }
    }
}

enum Finished {
    Exited { status: ExitStatus, stderr: Vec<u8> },
    Killed,
}

/// Wait for a child to exit, killing it if the session aborts first.
///
/// Output pipes are drained on background threads so a chatty child can't
/// fill a pipe and stall while we poll.
fn wait_or_abort(mut child: Child, abort: &AbortHandle) -> io::Result<Finished> {
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    loop {
        let exited = match child.try_wait() {
            Ok(exited) => exited,
            Err(e) => {
                kill_process_tree(&mut child);
                return Err(e);
            }
        };
        if let Some(status) = exited {
            // stdout is drained only to keep the pipe flowing
            if let Some(handle) = stdout {
                let _ = handle.join();
            }
            let stderr = stderr
                .and_then(|handle| handle.join().ok())
                .unwrap_or_default();
            return Ok(Finished::Exited { status, stderr });
        }

        if abort.is_requested() {
            tracing::debug!(pid = child.id(), "killing test process after session abort");
            kill_process_tree(&mut child);
            // Reader threads are detached: a grandchild may still hold the pipes.
            return Ok(Finished::Killed);
        }

        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Kill the child's process group, then the child itself, and reap it.
fn kill_process_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        if let Ok(pid) = i32::try_from(child.id())
            && let Err(e) = killpg(Pid::from_raw(pid), Signal::SIGKILL)
        {
            tracing::debug!(pid, error = %e, "failed to kill test process group");
        }
    }
    child.kill().ok();
    child.wait().ok();
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).ok();
        buf
    })
}

fn format_exit_failure(status: ExitStatus, stderr: &[u8]) -> String {
    let code = match status.code() {
        Some(code) => format!("exited with status {code}"),
        None => "terminated by signal".to_string(),
    };
    let stderr = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = stderr.lines().collect();
    let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
    if tail.trim().is_empty() {
        code
    } else {
        format!("{code}\n{tail}")
    }
}

// =============================================================================
// In-process items
// =============================================================================

type TestFn = dyn Fn(&ItemContext) -> Result<(), String> + Send + Sync;

/// A test backed by a closure; panics count as failures.
pub struct FnItem {
    name: String,
    body: Box<TestFn>,
}

impl FnItem {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&ItemContext) -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Box::new(body),
        }
    }
}

impl TestItem for FnItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: &ItemContext) -> ItemResult {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| (self.body)(ctx))) {
            Ok(Ok(())) => ItemResult::Passed,
            Ok(Err(message)) => ItemResult::Failed(message),
            Err(payload) => ItemResult::Failed(panic_message(payload.as_ref())),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("test panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("test panicked: {s}")
    } else {
        "test panicked".to_string()
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
