// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process identifier and state machine.
//!
//! A process is the unit the engine schedules: a port scan, a crack, a
//! transfer, a virus install. Its state machine and resource reservation are
//! owned exclusively by the engine for the process's entire non-terminal
//! life.

use crate::clock::Clock;
use crate::resource::ResourceShare;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

crate::define_id! {
    /// Unique identifier for a process instance.
    #[derive(Default)]
    pub struct Pid;
}

/// The action a process performs. Each variant corresponds to a row in the
/// action contract table: preconditions, duration formula, and completion
/// effect are implemented by the engine, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    PortScan,
    Crack,
    Download { file_id: String },
    Upload { file_id: String },
    InstallVirus { software_id: String },
    TransferFunds { from_account: String, to_account: String, amount_minor: i64 },
    DeleteLog { log_id: String },
    MissionObjective { mission_id: String, objective_id: String },
}

impl Action {
    /// Short machine name used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::PortScan => "port_scan",
            Action::Crack => "crack",
            Action::Download { .. } => "download",
            Action::Upload { .. } => "upload",
            Action::InstallVirus { .. } => "install_virus",
            Action::TransferFunds { .. } => "transfer_funds",
            Action::DeleteLog { .. } => "delete_log",
            Action::MissionObjective { .. } => "mission_objective",
        }
    }
}

/// Reasons a process can pause without being cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseReason {
    /// Player explicitly paused it. Not auto-resumable.
    Manual,
    /// Victim or platform security action. Not auto-resumable.
    Security,
    /// Evicted by a higher-priority admission. Auto-resumable.
    Resource,
}

impl PauseReason {
    pub fn is_auto_resumable(self) -> bool {
        matches!(self, PauseReason::Resource)
    }
}

/// Fatal failures can never be retried by re-issuing the same process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailReason {
    InvalidState,
    TargetGone,
    SoftwareUninstalled,
    NoResources,
    PasswordChanged,
    TransientNetwork,
}

impl FailReason {
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            FailReason::NoResources | FailReason::PasswordChanged | FailReason::TransientNetwork
        )
    }
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailReason::InvalidState => "invalid_state",
            FailReason::TargetGone => "target_gone",
            FailReason::SoftwareUninstalled => "software_uninstalled",
            FailReason::NoResources => "no_resources",
            FailReason::PasswordChanged => "password_changed",
            FailReason::TransientNetwork => "transient_network",
        };
        write!(f, "{s}")
    }
}

/// Process lifecycle state. Terminal variants are immutable once reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessState {
    Pending,
    Running,
    Paused { reason: PauseReason },
    CompletedOk,
    CompletedFail { reason: FailReason },
    Cancelled,
}

impl ProcessState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProcessState::CompletedOk | ProcessState::CompletedFail { .. } | ProcessState::Cancelled
        )
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ProcessState::Running)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, ProcessState::Paused { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProcessState::Pending => "pending",
            ProcessState::Running => "running",
            ProcessState::Paused { .. } => "paused",
            ProcessState::CompletedOk => "completed_ok",
            ProcessState::CompletedFail { .. } => "completed_fail",
            ProcessState::Cancelled => "cancelled",
        }
    }
}

/// Parameters needed to construct a new process.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub id: String,
    pub creator_id: String,
    pub target_server_id: String,
    pub action: Action,
    pub software_id: Option<String>,
    pub resource_request: ResourceShare,
    pub ideal_duration_seconds: u64,
    pub parent_pid: Option<String>,
    pub priority: u8,
    pub stealth_level: u8,
}

/// A process instance: the unit of work the engine schedules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    pub pid: String,
    pub creator_id: String,
    pub target_server_id: String,
    pub action: Action,
    pub software_id: Option<String>,
    pub resource_request: ResourceShare,
    pub start_epoch_ms: u64,
    #[serde(skip, default = "Instant::now")]
    pub current_run_started_at: Instant,
    pub ideal_duration_seconds: u64,
    pub accumulated_worked_seconds: f64,
    pub state: ProcessState,
    pub parent_pid: Option<String>,
    pub priority: u8,
    pub stealth_level: u8,
    pub detection_risk: f64,
    /// Action-specific parameters not otherwise modeled on `Action`.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Process {
    /// Construct a brand new PENDING process. Admission is the caller's
    /// (engine's) responsibility.
    pub fn new(config: ProcessConfig, clock: &impl Clock) -> Self {
        Self {
            pid: config.id,
            creator_id: config.creator_id,
            target_server_id: config.target_server_id,
            action: config.action,
            software_id: config.software_id,
            resource_request: config.resource_request,
            start_epoch_ms: clock.epoch_ms(),
            current_run_started_at: clock.now(),
            ideal_duration_seconds: config.ideal_duration_seconds,
            accumulated_worked_seconds: 0.0,
            state: ProcessState::Pending,
            parent_pid: config.parent_pid,
            priority: config.priority,
            stealth_level: config.stealth_level,
            detection_risk: 0.0,
            payload: serde_json::Value::Null,
        }
    }

    /// Derived progress fraction, never stored directly.
    pub fn progress(&self) -> f64 {
        if self.ideal_duration_seconds == 0 {
            return 1.0;
        }
        (self.accumulated_worked_seconds / self.ideal_duration_seconds as f64).min(1.0)
    }

    /// Roll the current run's elapsed time into `accumulated_worked_seconds`.
    /// Called on pause, cancel, and completion — anywhere the running clock
    /// needs to be folded into the durable counter.
    pub fn settle_elapsed(&mut self, clock: &impl Clock) {
        if self.state.is_running() {
            let elapsed = clock.now().saturating_duration_since(self.current_run_started_at);
            self.accumulated_worked_seconds += elapsed.as_secs_f64();
        }
    }

    /// Seconds remaining until ideal completion, given work already done.
    pub fn remaining_seconds(&self) -> f64 {
        (self.ideal_duration_seconds as f64 - self.accumulated_worked_seconds).max(0.0)
    }

    pub fn is_auto_resumable(&self) -> bool {
        matches!(self.state, ProcessState::Paused { reason } if reason.is_auto_resumable())
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
