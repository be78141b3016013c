pub mod abort;
pub mod cli;
pub mod cmd_init;
pub mod color;
pub mod config;
pub mod discovery;
pub mod error;
pub mod guard;
pub mod hooks;
pub mod item;
pub mod outcome;
pub mod output;
pub mod session;

pub use abort::{AbortHandle, AbortReason};
pub use cli::{Cli, Command, InitArgs, OutputFormat, RunArgs};
pub use error::{Error, ExitCode, Result};
pub use guard::{GuardSettings, Strategy, SuiteTimeoutGuard, TimeoutPolicy};
pub use hooks::{HookAction, ItemInfo, Plugin, SessionContext};
pub use item::{CommandItem, FnItem, ItemContext, ItemResult, TestItem};
pub use outcome::{SessionReport, TestOutcome, TestStatus};
pub use session::Session;

#[cfg(test)]
pub mod test_utils;
