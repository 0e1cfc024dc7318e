// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state rebuilt by replaying the event log.
//!
//! `apply_event` must be idempotent and self-contained: it never reads a
//! clock or anything outside the event itself, so that replaying the same
//! WAL twice (or replaying after a crash mid-batch) always lands on the
//! same state.

use breach_core::process::ProcessState;
use breach_core::{
    BankAccount, Event, LogEntry, MissionStatus, MissionTemplate, Money, Player, Process, Server, Software,
    UserMission,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MaterializedState {
    pub processes: HashMap<String, Process>,
    pub players: HashMap<String, Player>,
    pub servers: HashMap<String, Server>,
    pub software: HashMap<String, Software>,
    pub bank_accounts: HashMap<String, BankAccount>,
    pub user_missions: HashMap<String, UserMission>,
    pub mission_templates: HashMap<String, MissionTemplate>,
    pub log_entries: HashMap<String, LogEntry>,
}

impl MaterializedState {
    /// Processes created by the given player.
    pub fn processes_by_creator(&self, creator_id: &str) -> Vec<&Process> {
        self.processes.values().filter(|p| p.creator_id == creator_id).collect()
    }

    /// Processes running against the given target server.
    pub fn processes_by_target_server(&self, server_id: &str) -> Vec<&Process> {
        self.processes.values().filter(|p| p.target_server_id == server_id).collect()
    }

    /// Processes targeting any server owned by the given player.
    pub fn processes_by_victim(&self, victim_player_id: &str) -> Vec<&Process> {
        let owned: Vec<&str> = self
            .servers
            .values()
            .filter(|s| s.owner_id.as_deref() == Some(victim_player_id))
            .map(|s| s.server_id.as_str())
            .collect();
        self.processes
            .values()
            .filter(|p| owned.contains(&p.target_server_id.as_str()))
            .collect()
    }

    /// Processes currently in the given lifecycle state (`"pending"`, `"running"`, ...).
    pub fn processes_by_state(&self, kind: &str) -> Vec<&Process> {
        self.processes.values().filter(|p| p.state.kind() == kind).collect()
    }

    pub fn get_process(&self, pid: &str) -> Option<&Process> {
        self.processes.get(pid)
    }

    pub fn get_user_mission(&self, player_id: &str, mission_id: &str) -> Option<&UserMission> {
        self.user_missions.values().find(|m| m.player_id == player_id && m.mission_id == mission_id)
    }

    pub fn get_user_mission_mut(&mut self, player_id: &str, mission_id: &str) -> Option<&mut UserMission> {
        self.user_missions
            .values_mut()
            .find(|m| m.player_id == player_id && m.mission_id == mission_id)
    }

    /// Apply a single event, mutating state. Never fails: unknown ids are
    /// dropped silently (the entity was removed, or belongs to a stream this
    /// replica doesn't track) rather than treated as corruption.
    pub fn apply_event(&mut self, event: &Event) {
        match event {
            Event::ProcessStarted {
                pid,
                creator_id,
                target_server_id,
                action,
                software_id,
                resource_request,
                ideal_duration_seconds,
                parent_pid,
                priority,
                stealth_level,
                start_epoch_ms,
            } => {
                let process = Process {
                    pid: pid.clone(),
                    creator_id: creator_id.clone(),
                    target_server_id: target_server_id.clone(),
                    action: action.clone(),
                    software_id: software_id.clone(),
                    resource_request: *resource_request,
                    start_epoch_ms: *start_epoch_ms,
                    current_run_started_at: Instant::now(),
                    ideal_duration_seconds: *ideal_duration_seconds,
                    accumulated_worked_seconds: 0.0,
                    state: ProcessState::Running,
                    parent_pid: parent_pid.clone(),
                    priority: *priority,
                    stealth_level: *stealth_level,
                    detection_risk: 0.0,
                    payload: serde_json::Value::Null,
                };
                self.processes.insert(pid.clone(), process);
            }

            // Informational only; progress is derived from accumulated_worked_seconds
            // and is never stored directly, so replay doesn't need this event.
            Event::ProcessProgress { .. } => {}

            Event::ProcessCompletedOk { pid, accumulated_worked_seconds } => {
                if let Some(process) = self.processes.get_mut(pid) {
                    process.accumulated_worked_seconds = *accumulated_worked_seconds;
                    process.state = ProcessState::CompletedOk;
                }
            }

            Event::ProcessCompletedFail { pid, reason, accumulated_worked_seconds } => {
                if let Some(process) = self.processes.get_mut(pid) {
                    process.accumulated_worked_seconds = *accumulated_worked_seconds;
                    process.state = ProcessState::CompletedFail { reason: *reason };
                }
            }

            Event::ProcessCancelled { pid, accumulated_worked_seconds } => {
                if let Some(process) = self.processes.get_mut(pid) {
                    process.accumulated_worked_seconds = *accumulated_worked_seconds;
                    process.state = ProcessState::Cancelled;
                }
            }

            Event::ProcessPaused { pid, reason, accumulated_worked_seconds } => {
                if let Some(process) = self.processes.get_mut(pid) {
                    process.accumulated_worked_seconds = *accumulated_worked_seconds;
                    process.state = ProcessState::Paused { reason: *reason };
                }
            }

            Event::ProcessResumed { pid } => {
                if let Some(process) = self.processes.get_mut(pid) {
                    process.state = ProcessState::Running;
                    process.current_run_started_at = Instant::now();
                }
            }

            Event::SecurityEvent { pid, risk_delta, .. } => {
                if let Some(process) = self.processes.get_mut(pid) {
                    process.detection_risk = (process.detection_risk + risk_delta).min(1.0);
                }
            }

            Event::BankTransfer { from_account, to_account, amount_minor, fee_minor, .. } => {
                let amount = Money(*amount_minor);
                let fee = Money(*fee_minor);
                if let Some(from) = self.bank_accounts.get_mut(from_account) {
                    from.balance -= amount + fee;
                }
                if let Some(to) = self.bank_accounts.get_mut(to_account) {
                    to.balance += amount;
                }
            }

            // The effect layer already only emits this when the objective is
            // below its requirement, but replay re-derives the cap itself
            // rather than trusting that, since apply_event is the one place
            // that must hold the invariant regardless of who appended the
            // event.
            Event::MissionAdvanced { player_id, mission_id, objective_id } => {
                let required_count = self
                    .mission_templates
                    .get(mission_id)
                    .and_then(|t| t.objectives.iter().find(|o| &o.objective_id == objective_id))
                    .map(|o| o.required_count);
                if let Some(mission) = self.get_user_mission_mut(player_id, mission_id) {
                    let count = mission.objective_progress.entry(objective_id.clone()).or_insert(0);
                    if required_count.is_none_or(|required| *count < required) {
                        *count += 1;
                    }
                }
            }

            Event::MissionCompleted { player_id, mission_id } => {
                if let Some(mission) = self.get_user_mission_mut(player_id, mission_id) {
                    mission.status = MissionStatus::Completed;
                }
            }

            Event::WalletCredited { player_id, amount_minor } => {
                if let Some(player) = self.players.get_mut(player_id) {
                    player.wallet_balance += Money(*amount_minor);
                }
            }

            Event::WalletDebited { player_id, amount_minor } => {
                if let Some(player) = self.players.get_mut(player_id) {
                    player.wallet_balance -= Money(*amount_minor);
                }
            }

            Event::ReputationAdjusted { player_id, category, delta } => {
                if let Some(player) = self.players.get_mut(player_id) {
                    player.adjust_reputation(category, *delta);
                }
            }

            Event::LogWritten {
                log_id,
                category,
                player_id,
                target_server_id,
                message,
                epoch_ms,
            } => {
                self.log_entries.insert(
                    log_id.clone(),
                    LogEntry::new(log_id.clone(), *category, player_id, target_server_id.clone(), message, *epoch_ms),
                );
            }

            Event::LogTombstoned { log_id } => {
                if let Some(entry) = self.log_entries.get_mut(log_id) {
                    entry.tombstoned = true;
                }
            }

            // Bus-only notifications: nothing durable to update.
            Event::Notification { .. }
            | Event::StatsUpdate { .. }
            | Event::PlayerOnline { .. }
            | Event::PlayerOffline { .. }
            | Event::Backpressure
            | Event::Custom => {}
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
