// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

/// Typed configuration resolved once at startup from `BREACH_*` environment
/// variables (falling back to sane local defaults).
#[derive(Debug, Clone)]
pub struct Config {
    pub state_dir: PathBuf,
    pub log_dir: PathBuf,
    pub http_bind_addr: String,
    pub heartbeat_interval_ms: u64,
    pub outbound_queue_capacity: usize,
    pub max_timer_skew_ms: u64,
    pub admission_retry_count: u32,
    pub eviction_enabled: bool,
}

impl Config {
    pub fn load() -> Self {
        Self {
            state_dir: state_dir(),
            log_dir: log_dir(),
            http_bind_addr: env_string("BREACH_HTTP_BIND_ADDR", "0.0.0.0:8080"),
            heartbeat_interval_ms: env_u64("BREACH_HEARTBEAT_MS", 30_000),
            outbound_queue_capacity: env_u64("BREACH_OUTBOUND_QUEUE_CAPACITY", 256) as usize,
            max_timer_skew_ms: env_u64("BREACH_MAX_TIMER_SKEW_MS", 250),
            admission_retry_count: env_u64("BREACH_ADMISSION_RETRY_COUNT", 8) as u32,
            eviction_enabled: env_bool("BREACH_EVICTION_ENABLED", true),
        }
    }

    pub fn wal_path(&self) -> PathBuf {
        self.state_dir.join("breach.wal")
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.state_dir.join("breach.snapshot")
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join("breachd.log")
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }
}

/// Resolve state directory: `BREACH_STATE_DIR` > `XDG_STATE_HOME/breach` >
/// `~/.local/state/breach`.
fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BREACH_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("breach");
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".local/state/breach")
}

fn log_dir() -> PathBuf {
    std::env::var("BREACH_LOG_DIR").map(PathBuf::from).unwrap_or_else(|_| state_dir().join("logs"))
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
