// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration parsing and validation.
//!
//! Handles curfew.toml parsing with version validation and unknown key warnings.

pub mod defaults;
pub mod duration;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::guard::{GuardSettings, Strategy, TimeoutPolicy};
use crate::item::{CommandItem, TestItem};

/// Supported config version.
pub const SUPPORTED_VERSION: i64 = 1;

/// Minimum config structure for version checking.
#[derive(Deserialize)]
struct VersionOnly {
    version: Option<i64>,
}

/// Config with flexible parsing that captures unknown keys.
#[derive(Deserialize)]
struct FlexibleConfig {
    #[serde(default)]
    suite: SuiteConfig,

    #[serde(default, rename = "test")]
    tests: Vec<TestEntry>,

    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

/// Full configuration.
#[derive(Debug, Default)]
pub struct Config {
    /// Config file version (must be 1).
    pub version: i64,

    /// Suite-wide settings.
    pub suite: SuiteConfig,

    /// Test commands, in run order.
    pub tests: Vec<TestEntry>,
}

/// `[suite]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    /// Wall-clock limit for the whole run; 0 disables.
    #[serde(default, deserialize_with = "duration::deserialize_timeout")]
    pub timeout: Option<Duration>,

    #[serde(default)]
    pub strategy: Option<Strategy>,

    #[serde(default)]
    pub on_timeout: Option<TimeoutPolicy>,
}

/// One `[[test]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestEntry {
    pub name: String,

    /// Shell command; exit status 0 passes.
    pub run: String,

    /// Working directory, relative to the config file.
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    /// Extra environment variables.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Config {
    /// Guard settings from the config, falling back to defaults.
    pub fn guard_settings(&self) -> GuardSettings {
        let defaults = GuardSettings::default();
        GuardSettings {
            timeout: self.suite.timeout.or(defaults.timeout),
            strategy: self.suite.strategy.unwrap_or(defaults.strategy),
            on_timeout: self.suite.on_timeout.unwrap_or(defaults.on_timeout),
        }
    }

    /// Build runnable items. Relative `cwd`s resolve against `base_dir`.
    pub fn items(&self, base_dir: &Path) -> Vec<Box<dyn TestItem>> {
        self.tests
            .iter()
            .map(|entry| {
                let cwd = match &entry.cwd {
                    Some(cwd) => base_dir.join(cwd),
                    None => base_dir.to_path_buf(),
                };
                Box::new(
                    CommandItem::new(&entry.name, &entry.run)
                        .with_cwd(cwd)
                        .with_env(entry.env.clone()),
                ) as Box<dyn TestItem>
            })
            .collect()
    }
}

/// Load config from file, warning on unknown top-level keys.
pub fn load(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse(&content, path)
}

/// Parse config from string content.
pub fn parse(content: &str, path: &Path) -> Result<Config> {
    let config_error = |message: String| Error::Config {
        message,
        path: Some(path.to_path_buf()),
    };

    let version_check: VersionOnly =
        toml::from_str(content).map_err(|e| config_error(e.to_string()))?;
    let version = version_check
        .version
        .ok_or_else(|| config_error("missing required field: version".to_string()))?;
    if version != SUPPORTED_VERSION {
        return Err(config_error(format!(
            "unsupported config version {version} (supported: {SUPPORTED_VERSION})"
        )));
    }

    let flexible: FlexibleConfig =
        toml::from_str(content).map_err(|e| config_error(e.to_string()))?;

    for key in flexible.unknown.keys().filter(|k| k.as_str() != "version") {
        warn_unknown_key(path, key);
    }

    validate_tests(&flexible.tests).map_err(config_error)?;

    Ok(Config {
        version,
        suite: flexible.suite,
        tests: flexible.tests,
    })
}

fn validate_tests(tests: &[TestEntry]) -> std::result::Result<(), String> {
    let mut seen = BTreeSet::new();
    for entry in tests {
        if entry.name.trim().is_empty() {
            return Err("test name must not be empty".to_string());
        }
        if entry.run.trim().is_empty() {
            return Err(format!("test `{}`: run must not be empty", entry.name));
        }
        if !seen.insert(entry.name.as_str()) {
            return Err(format!("duplicate test name `{}`", entry.name));
        }
    }
    Ok(())
}

fn warn_unknown_key(path: &Path, key: &str) {
    tracing::warn!(path = %path.display(), key, "unrecognized config field");
    eprintln!(
        "curfew: warning: {}: unrecognized field `{}` (ignored)",
        path.display(),
        key
    );
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
