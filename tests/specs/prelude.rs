//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for running the curfew CLI against temp projects.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub use assert_cmd::prelude::*;
pub use predicates;
pub use predicates::prelude::{Predicate, PredicateBooleanExt};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Trait for converting into a string predicate.
/// Allows passing `&str` (as contains) or any `Predicate<str>`.
pub trait IntoStrPredicate<P: Predicate<str>> {
    fn into_predicate(self) -> P;
}

impl IntoStrPredicate<predicates::str::ContainsPredicate> for &str {
    fn into_predicate(self) -> predicates::str::ContainsPredicate {
        predicates::str::contains(self)
    }
}

impl<P: Predicate<str>> IntoStrPredicate<P> for P {
    fn into_predicate(self) -> P {
        self
    }
}

/// Returns a Command configured to run the curfew binary
pub fn curfew_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("curfew"))
}

/// Create a builder for `curfew run`
pub fn run() -> RunBuilder<Text> {
    RunBuilder::new()
}

/// Typestate markers for output mode
pub struct Text;
pub struct Json;

/// High-level `curfew run` builder for fluent test assertions
pub struct RunBuilder<Mode = Text> {
    dir: Option<PathBuf>,
    args: Vec<String>,
    envs: Vec<(String, String)>,
    _mode: PhantomData<Mode>,
}

#[allow(dead_code)]
impl RunBuilder<Text> {
    fn new() -> Self {
        Self {
            dir: None,
            args: Vec::new(),
            envs: Vec::new(),
            _mode: PhantomData,
        }
    }

    /// Switch to JSON output mode
    pub fn json(self) -> RunBuilder<Json> {
        RunBuilder {
            dir: self.dir,
            args: self.args,
            envs: self.envs,
            _mode: PhantomData,
        }
    }

    /// Run and expect every test to pass (exit 0)
    pub fn passes(self) -> RunAssert {
        self.exits(0)
    }

    /// Run and expect test failures (exit 1)
    pub fn fails(self) -> RunAssert {
        self.exits(1)
    }

    /// Run and expect the session to be aborted (exit 4)
    pub fn aborts(self) -> RunAssert {
        self.exits(4)
    }

    /// Run and expect a specific exit code
    pub fn exits(self, code: i32) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert_eq!(
            output.status.code(),
            Some(code),
            "unexpected exit code\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

#[allow(dead_code)]
impl RunBuilder<Json> {
    /// Run and parse the JSON report, expecting a specific exit code
    pub fn exits(self, code: i32) -> RunJson {
        let output = self.command().output().expect("command should run");
        assert_eq!(
            output.status.code(),
            Some(code),
            "unexpected exit code\nstderr:\n{}",
            String::from_utf8_lossy(&output.stderr)
        );
        let value = serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
            panic!(
                "stdout is not valid JSON: {e}\n{}",
                String::from_utf8_lossy(&output.stdout)
            )
        });
        RunJson { value }
    }
}

#[allow(dead_code)]
impl<Mode: 'static> RunBuilder<Mode> {
    /// Set working directory
    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    /// Add CLI arguments
    pub fn args<'a>(mut self, args: impl IntoIterator<Item = &'a str>) -> Self {
        self.args.extend(args.into_iter().map(|s| s.to_string()));
        self
    }

    /// Set environment variable
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    /// Build the command without running it
    fn command(self) -> Command {
        let is_json = std::any::TypeId::of::<Mode>() == std::any::TypeId::of::<Json>();
        let mut cmd = curfew_cmd();
        cmd.arg("run");

        if is_json {
            cmd.args(["-o", "json"]);
        }

        cmd.args(&self.args);

        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }

        cmd.env_remove("CURFEW_CONFIG");
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }

        cmd
    }
}

/// Result of a run for chaining assertions
pub struct RunAssert {
    output: std::process::Output,
}

#[allow(dead_code)]
impl RunAssert {
    /// Get stdout as string
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    /// Get stderr as string
    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert stdout matches predicate.
    ///
    /// ```ignore
    /// .stdout_has("FAIL")  // contains
    /// .stdout_has(predicates::str::is_match(r"^\d+ passed").unwrap())
    /// ```
    pub fn stdout_has<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stdout = String::from_utf8_lossy(&self.output.stdout);
        assert!(
            predicate.into_predicate().eval(&stdout),
            "stdout predicate failed:\n{}",
            stdout
        );
        self
    }

    /// Assert stdout does not match predicate.
    pub fn stdout_lacks<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stdout = String::from_utf8_lossy(&self.output.stdout);
        assert!(
            !predicate.into_predicate().eval(&stdout),
            "stdout should NOT match predicate:\n{}",
            stdout
        );
        self
    }

    /// Assert stderr matches predicate.
    pub fn stderr_has<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stderr = String::from_utf8_lossy(&self.output.stderr);
        assert!(
            predicate.into_predicate().eval(&stderr),
            "stderr predicate failed:\n{}",
            stderr
        );
        self
    }

    /// Assert stderr does not match predicate.
    pub fn stderr_lacks<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stderr = String::from_utf8_lossy(&self.output.stderr);
        assert!(
            !predicate.into_predicate().eval(&stderr),
            "stderr should NOT match predicate:\n{}",
            stderr
        );
        self
    }
}

/// Parsed JSON report
pub struct RunJson {
    value: serde_json::Value,
}

#[allow(dead_code)]
impl RunJson {
    /// Get the raw JSON value
    pub fn value(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a required top-level field (panics if missing)
    pub fn require(&self, key: &str) -> &serde_json::Value {
        self.value
            .get(key)
            .unwrap_or_else(|| panic!("missing field `{key}` in:\n{:#}", self.value))
    }

    /// Get the outcome for a named test (panics if missing)
    pub fn test(&self, name: &str) -> &serde_json::Value {
        self.require("tests")
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["name"] == name)
            .unwrap_or_else(|| panic!("no outcome for test `{name}` in:\n{:#}", self.value))
    }

    /// Names of tests that never started
    pub fn not_run(&self) -> Vec<String> {
        self.require("not_run")
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }
}

// =============================================================================
// Project
// =============================================================================

/// Temporary project directory holding a curfew.toml.
///
/// ```ignore
/// let temp = Project::empty();
/// temp.config("[suite]\ntimeout = 2");
/// temp.test("one", "true");
/// run().pwd(temp.path()).passes();
/// ```
pub struct Project {
    dir: tempfile::TempDir,
    suite: String,
    tests: Vec<String>,
}

#[allow(dead_code)]
impl Project {
    /// Create an empty project with no files
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            suite: String::new(),
            tests: Vec::new(),
        }
    }

    /// Project path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Set the `[suite]` table body (writes curfew.toml with `version = 1` prefix)
    pub fn config(&mut self, suite: &str) -> &mut Self {
        self.suite = suite.to_string();
        self.write_config();
        self
    }

    /// Append a `[[test]]` entry
    pub fn test(&mut self, name: &str, run: &str) -> &mut Self {
        self.tests.push(format!(
            "[[test]]\nname = {}\nrun = {}\n",
            toml_string(name),
            toml_string(run)
        ));
        self.write_config();
        self
    }

    /// Write a file relative to the project root (creates parent dirs)
    pub fn file(&self, path: impl AsRef<Path>, content: &str) {
        let full = self.dir.path().join(path.as_ref());
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }

    /// Overwrite curfew.toml verbatim
    pub fn raw_config(&self, content: &str) {
        self.file("curfew.toml", content);
    }

    fn write_config(&self) {
        let mut content = String::from("version = 1\n");
        if !self.suite.is_empty() {
            content.push_str("\n[suite]\n");
            content.push_str(&self.suite);
            content.push('\n');
        }
        for test in &self.tests {
            content.push('\n');
            content.push_str(test);
        }
        self.raw_config(&content);
    }
}

fn toml_string(s: &str) -> String {
    format!("'{}'", s)
}
