// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON wire frames exchanged over the bus WebSocket.
//!
//! Every frame is a JSON object tagged by `type`; client and server frames
//! share no variants so a decoder never has to guess direction.

use breach_core::{process::FailReason, Event};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    Auth { token: String },
    Subscribe { channel: String },
    Unsubscribe { channel: String },
    Ping,
    ChatMessage { channel: String, body: String },
    SessionUpdate { status: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    AuthResponse { success: bool, reason: Option<String> },
    Pong,
    Connected { connection_id: String },
    Backpressure,
    ProcessUpdate { pid: String, progress: f64, time_remaining: f64 },
    ProcessComplete { pid: String, action_name: String, result: String },
    StatsUpdate { player_id: String },
    Notification { title: String, message: String, level: NotificationLevel },
    AttackStarted { attacker_name: String, target_name: String },
    AttackCompleted { attacker_name: String, target_name: String, success: bool },
    ClanUpdate { clan_id: String },
    PlayerOnline { player_id: String },
    PlayerOffline { player_id: String },
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Translate a durable `Event` into the frame(s) published to a subscriber.
///
/// Returns `None` for events that have no client-facing representation
/// (e.g. `LogWritten`, which is audit-only).
pub fn frame_for_event(event: &Event) -> Option<ServerFrame> {
    match event {
        Event::ProcessProgress { pid, progress } => Some(ServerFrame::ProcessUpdate {
            pid: pid.clone(),
            progress: *progress,
            time_remaining: (1.0 - progress).max(0.0),
        }),
        Event::ProcessCompletedOk { pid, .. } => Some(ServerFrame::ProcessComplete {
            pid: pid.clone(),
            action_name: String::new(),
            result: "success".to_string(),
        }),
        Event::ProcessCompletedFail { pid, reason, .. } => Some(ServerFrame::ProcessComplete {
            pid: pid.clone(),
            action_name: String::new(),
            result: fail_reason_label(reason).to_string(),
        }),
        Event::SecurityEvent { victim_id, message, .. } => Some(ServerFrame::Notification {
            title: "Security alert".to_string(),
            message: format!("{victim_id}: {message}"),
            level: NotificationLevel::Warning,
        }),
        Event::Notification { message, .. } => Some(ServerFrame::Notification {
            title: "Notification".to_string(),
            message: message.clone(),
            level: NotificationLevel::Info,
        }),
        Event::StatsUpdate { player_id } => Some(ServerFrame::StatsUpdate { player_id: player_id.clone() }),
        Event::PlayerOnline { player_id, .. } => Some(ServerFrame::PlayerOnline { player_id: player_id.clone() }),
        Event::PlayerOffline { player_id } => Some(ServerFrame::PlayerOffline { player_id: player_id.clone() }),
        Event::Backpressure => Some(ServerFrame::Backpressure),
        _ => None,
    }
}

fn fail_reason_label(reason: &FailReason) -> &'static str {
    match reason {
        FailReason::InvalidState => "invalid_state",
        FailReason::TargetGone => "target_gone",
        FailReason::SoftwareUninstalled => "software_uninstalled",
        FailReason::NoResources => "no_resources",
        FailReason::PasswordChanged => "password_changed",
        FailReason::TransientNetwork => "transient_network",
    }
}

/// An event is critical (never dropped for backpressure) if its frame
/// carries authentication state or a security alert.
pub fn is_critical(frame: &ServerFrame) -> bool {
    matches!(
        frame,
        ServerFrame::AuthResponse { .. } | ServerFrame::Connected { .. } | ServerFrame::Notification { level: NotificationLevel::Warning | NotificationLevel::Error, .. }
    )
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
