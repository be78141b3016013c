// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Duration parsing for the suite time limit.
//!
//! Supports formats:
//! - `900` or `"900"` → 900 seconds
//! - `"30s"` → 30 seconds
//! - `"500ms"` → 500 milliseconds
//! - `"15m"` → 15 minutes
//! - `"2h"` → 2 hours
//! - `"1.5s"` → 1.5 seconds

use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Parse a duration string into a Duration.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("empty duration string".to_string());
    }
    if s.starts_with('-') {
        return Err(format!("negative duration: {s}"));
    }

    // Check for milliseconds first (longer suffix)
    if let Some(ms) = s.strip_suffix("ms") {
        return Ok(Duration::from_millis(parse_whole(ms, s)?));
    }

    // Check for seconds (supports fractional)
    if let Some(secs) = s.strip_suffix('s') {
        let n: f64 = secs
            .trim()
            .parse()
            .map_err(|_| format!("invalid duration: {s}"))?;
        return Duration::try_from_secs_f64(n).map_err(|_| format!("invalid duration: {s}"));
    }

    if let Some(mins) = s.strip_suffix('m') {
        return scaled(parse_whole(mins, s)?, 60, s);
    }

    if let Some(hours) = s.strip_suffix('h') {
        return scaled(parse_whole(hours, s)?, 60 * 60, s);
    }

    Err(format!(
        "invalid duration format: {s} (use 900, 30s, 500ms, 15m, or 2h)"
    ))
}

/// Parse a suite timeout: bare integer seconds or a duration string.
pub fn parse_timeout(s: &str) -> Result<Duration, String> {
    let trimmed = s.trim();
    if let Ok(secs) = trimmed.parse::<i64>() {
        return seconds(secs);
    }
    parse_duration(trimmed)
}

fn parse_whole(number: &str, original: &str) -> Result<u64, String> {
    number
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration: {original}"))
}

fn scaled(n: u64, unit: u64, original: &str) -> Result<Duration, String> {
    n.checked_mul(unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration too large: {original}"))
}

fn seconds(secs: i64) -> Result<Duration, String> {
    u64::try_from(secs)
        .map(Duration::from_secs)
        .map_err(|_| format!("negative duration: {secs}"))
}

/// Raw timeout as written in TOML.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimeout {
    Seconds(i64),
    Text(String),
}

/// Deserialize an optional timeout from an integer or a duration string.
pub fn deserialize_timeout<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawTimeout> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(RawTimeout::Seconds(secs)) => seconds(secs)
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(RawTimeout::Text(s)) => parse_timeout(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
