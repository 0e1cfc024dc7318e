// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event types published by the engine and effect layer, and fanned out by
//! the realtime bus.
//!
//! Serializes with `{"type": "domain:verb", ...fields}`. Unknown type tags
//! deserialize to `Custom` so older clients don't choke on new event kinds.

use crate::process::{Action, FailReason};
use crate::resource::ResourceShare;
use serde::{Deserialize, Serialize};

/// Events produced by the process engine, effect layer, and bus itself.
///
/// Process events carry enough of the process's construction state to
/// rebuild it during WAL replay (event sourcing): the materialized store
/// never reads from anywhere but the event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "process:started")]
    ProcessStarted {
        pid: String,
        creator_id: String,
        target_server_id: String,
        action: Action,
        software_id: Option<String>,
        resource_request: ResourceShare,
        ideal_duration_seconds: u64,
        parent_pid: Option<String>,
        priority: u8,
        stealth_level: u8,
        start_epoch_ms: u64,
    },

    #[serde(rename = "process:progress")]
    ProcessProgress { pid: String, progress: f64 },

    #[serde(rename = "process:completed_ok")]
    ProcessCompletedOk {
        pid: String,
        accumulated_worked_seconds: f64,
    },

    #[serde(rename = "process:completed_fail")]
    ProcessCompletedFail {
        pid: String,
        reason: FailReason,
        accumulated_worked_seconds: f64,
    },

    #[serde(rename = "process:cancelled")]
    ProcessCancelled {
        pid: String,
        accumulated_worked_seconds: f64,
    },

    #[serde(rename = "process:paused")]
    ProcessPaused {
        pid: String,
        reason: crate::process::PauseReason,
        accumulated_worked_seconds: f64,
    },

    #[serde(rename = "process:resumed")]
    ProcessResumed { pid: String },

    #[serde(rename = "security:detected")]
    SecurityEvent {
        victim_id: String,
        pid: String,
        actor_stealth: f64,
        message: String,
        risk_delta: f64,
    },

    #[serde(rename = "bank:transfer")]
    BankTransfer {
        transfer_id: String,
        from_account: String,
        to_account: String,
        amount_minor: i64,
        fee_minor: i64,
    },

    #[serde(rename = "mission:advanced")]
    MissionAdvanced {
        player_id: String,
        mission_id: String,
        objective_id: String,
    },

    #[serde(rename = "mission:completed")]
    MissionCompleted { player_id: String, mission_id: String },

    #[serde(rename = "wallet:credited")]
    WalletCredited { player_id: String, amount_minor: i64 },

    #[serde(rename = "wallet:debited")]
    WalletDebited { player_id: String, amount_minor: i64 },

    #[serde(rename = "reputation:adjusted")]
    ReputationAdjusted {
        player_id: String,
        category: String,
        delta: i32,
    },

    #[serde(rename = "log:written")]
    LogWritten {
        log_id: String,
        category: crate::log_entry::LogCategory,
        player_id: String,
        target_server_id: Option<String>,
        message: String,
        epoch_ms: u64,
    },

    #[serde(rename = "log:tombstoned")]
    LogTombstoned { log_id: String },

    #[serde(rename = "notification")]
    Notification { player_id: String, message: String },

    #[serde(rename = "stats:update")]
    StatsUpdate { player_id: String },

    #[serde(rename = "player:online")]
    PlayerOnline {
        player_id: String,
        connection_id: String,
    },

    #[serde(rename = "player:offline")]
    PlayerOffline { player_id: String },

    /// Emitted on a subscriber's own channel when a queue drop occurs, so
    /// the client knows to resync via `/sync`.
    #[serde(rename = "backpressure")]
    Backpressure,

    /// Catch-all for unknown event types (extensibility).
    #[serde(other, skip_serializing)]
    Custom,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::ProcessStarted { .. } => "process:started",
            Event::ProcessProgress { .. } => "process:progress",
            Event::ProcessCompletedOk { .. } => "process:completed_ok",
            Event::ProcessCompletedFail { .. } => "process:completed_fail",
            Event::ProcessCancelled { .. } => "process:cancelled",
            Event::ProcessPaused { .. } => "process:paused",
            Event::ProcessResumed { .. } => "process:resumed",
            Event::SecurityEvent { .. } => "security:detected",
            Event::BankTransfer { .. } => "bank:transfer",
            Event::MissionAdvanced { .. } => "mission:advanced",
            Event::MissionCompleted { .. } => "mission:completed",
            Event::WalletCredited { .. } => "wallet:credited",
            Event::WalletDebited { .. } => "wallet:debited",
            Event::ReputationAdjusted { .. } => "reputation:adjusted",
            Event::LogWritten { .. } => "log:written",
            Event::LogTombstoned { .. } => "log:tombstoned",
            Event::Notification { .. } => "notification",
            Event::StatsUpdate { .. } => "stats:update",
            Event::PlayerOnline { .. } => "player:online",
            Event::PlayerOffline { .. } => "player:offline",
            Event::Backpressure => "backpressure",
            Event::Custom => "custom",
        }
    }

    /// Whether this event must never be dropped by a backpressured
    /// outbound queue.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Event::SecurityEvent { .. } | Event::PlayerOnline { .. } | Event::Backpressure
        )
    }

    /// Which channel this event is naturally routed to, when derivable
    /// from the event itself (process/mission/stats events route via
    /// `user:<player_id>` of the relevant player).
    pub fn log_summary(&self) -> String {
        let t = self.name();
        match self {
            Event::ProcessStarted { pid, action, .. } => format!("{t} pid={pid} action={}", action.kind()),
            Event::ProcessProgress { pid, progress } => format!("{t} pid={pid} progress={progress:.2}"),
            Event::ProcessCompletedOk { pid, .. } => format!("{t} pid={pid}"),
            Event::ProcessCompletedFail { pid, reason, .. } => format!("{t} pid={pid} reason={reason}"),
            Event::ProcessCancelled { pid, .. } => format!("{t} pid={pid}"),
            Event::ProcessPaused { pid, .. } => format!("{t} pid={pid}"),
            Event::ProcessResumed { pid } => format!("{t} pid={pid}"),
            Event::SecurityEvent { victim_id, pid, .. } => format!("{t} victim={victim_id} pid={pid}"),
            Event::BankTransfer { transfer_id, .. } => format!("{t} transfer={transfer_id}"),
            Event::MissionAdvanced { player_id, mission_id, .. } => {
                format!("{t} player={player_id} mission={mission_id}")
            }
            Event::MissionCompleted { player_id, mission_id } => {
                format!("{t} player={player_id} mission={mission_id}")
            }
            Event::WalletCredited { player_id, amount_minor } => format!("{t} player={player_id} amount={amount_minor}"),
            Event::WalletDebited { player_id, amount_minor } => format!("{t} player={player_id} amount={amount_minor}"),
            Event::ReputationAdjusted { player_id, category, .. } => format!("{t} player={player_id} category={category}"),
            Event::LogWritten { log_id, .. } => format!("{t} log={log_id}"),
            Event::LogTombstoned { log_id } => format!("{t} log={log_id}"),
            Event::Notification { player_id, .. } => format!("{t} player={player_id}"),
            Event::StatsUpdate { player_id } => format!("{t} player={player_id}"),
            Event::PlayerOnline { player_id, .. } => format!("{t} player={player_id}"),
            Event::PlayerOffline { player_id } => format!("{t} player={player_id}"),
            Event::Backpressure | Event::Custom => t.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
