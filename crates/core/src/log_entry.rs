// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only log entries: security, hacking, action, and audit trails.

use serde::{Deserialize, Serialize};

crate::define_id! {
    #[derive(Default)]
    pub struct LogEntryId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Security,
    Hacking,
    Action,
    Audit,
}

/// A single append-only log entry. Once written, only `tombstoned` may
/// change (in response to a successful DeleteLog process).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub log_id: String,
    pub category: LogCategory,
    pub player_id: String,
    pub target_server_id: Option<String>,
    pub message: String,
    pub epoch_ms: u64,
    #[serde(default)]
    pub tombstoned: bool,
}

impl LogEntry {
    pub fn new(
        log_id: impl Into<String>,
        category: LogCategory,
        player_id: impl Into<String>,
        target_server_id: Option<String>,
        message: impl Into<String>,
        epoch_ms: u64,
    ) -> Self {
        Self {
            log_id: log_id.into(),
            category,
            player_id: player_id.into(),
            target_server_id,
            message: message.into(),
            epoch_ms,
            tombstoned: false,
        }
    }
}

#[cfg(test)]
#[path = "log_entry_tests.rs"]
mod tests;
