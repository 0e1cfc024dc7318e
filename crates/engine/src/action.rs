// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-action resource profile, duration formula, and completion effects.
//!
//! Exact constants (base durations, resource weights) are an implementation
//! detail the spec leaves open; see DESIGN.md for the values chosen here.

use breach_core::process::Action;
use breach_core::{Effect, LogCategory, Money, Process, ResourceShare};
use serde::{Deserialize, Serialize};

/// Inputs resolved by the caller from the target/software entities that the
/// action's duration formula is a function of. Not every field applies to
/// every action.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionInputs {
    /// Scanner/cracker effectiveness, or 1.0 where not applicable.
    pub effectiveness: f64,
    /// Target firewall level or password strength, or 0.0 where not applicable.
    pub target_difficulty: f64,
    /// File or log size in abstract units, or 0 where not applicable.
    pub size: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct ActionContract {
    pub resource_request: ResourceShare,
    pub ideal_duration_seconds: u64,
}

/// Duration grows with target difficulty and shrinks with effectiveness,
/// monotonic in both: `base * (difficulty / effectiveness)`, floored at 1s.
fn duration_from_ratio(difficulty: f64, effectiveness: f64, base: u64) -> u64 {
    let ratio = (difficulty.max(0.0) / effectiveness.max(0.01)).max(0.1);
    ((base as f64) * ratio).round().max(1.0) as u64
}

pub fn contract_for(action: &Action, inputs: &ActionInputs) -> ActionContract {
    match action {
        Action::PortScan => ActionContract {
            resource_request: ResourceShare::new(5, 5, 15),
            ideal_duration_seconds: duration_from_ratio(inputs.target_difficulty, inputs.effectiveness, 30),
        },
        Action::Crack => ActionContract {
            resource_request: ResourceShare::new(20, 10, 5),
            ideal_duration_seconds: duration_from_ratio(inputs.target_difficulty, inputs.effectiveness, 60),
        },
        Action::Download { .. } => ActionContract {
            resource_request: ResourceShare::new(5, 5, 30),
            ideal_duration_seconds: (inputs.size / 10).max(5),
        },
        Action::Upload { .. } => ActionContract {
            resource_request: ResourceShare::new(5, 5, 25),
            ideal_duration_seconds: (inputs.size / 8).max(5),
        },
        Action::InstallVirus { .. } => ActionContract {
            resource_request: ResourceShare::new(10, 15, 5),
            ideal_duration_seconds: 45,
        },
        Action::TransferFunds { .. } => ActionContract {
            resource_request: ResourceShare::new(2, 2, 2),
            ideal_duration_seconds: 10,
        },
        Action::DeleteLog { .. } => ActionContract {
            resource_request: ResourceShare::new(5, 5, 5),
            ideal_duration_seconds: (inputs.size / 5).max(3),
        },
        Action::MissionObjective { .. } => {
            ActionContract { resource_request: ResourceShare::ZERO, ideal_duration_seconds: 0 }
        }
    }
}

/// Effects staged when a process reaches `COMPLETED_OK`. `creator_home_server_id`
/// is the one piece of context not derivable from `Process` itself.
pub fn completion_effects(process: &Process, creator_home_server_id: &str, now_epoch_ms: u64) -> Vec<Effect> {
    match &process.action {
        Action::PortScan => vec![Effect::WriteLog {
            log_id: format!("log-{}-scan", process.pid),
            category: LogCategory::Hacking,
            player_id: process.creator_id.clone(),
            target_server_id: Some(process.target_server_id.clone()),
            message: format!("port scan by {} found open ports", process.creator_id),
        }],
        Action::Crack => vec![Effect::GrantCredential {
            player_id: process.creator_id.clone(),
            target_server_id: process.target_server_id.clone(),
            expires_epoch_ms: now_epoch_ms + 3_600_000,
        }],
        Action::Download { file_id } => vec![Effect::CopyFile {
            file_id: file_id.clone(),
            from_server_id: process.target_server_id.clone(),
            to_server_id: creator_home_server_id.to_string(),
        }],
        Action::Upload { file_id } => {
            vec![Effect::PlaceFile { file_id: file_id.clone(), target_server_id: process.target_server_id.clone() }]
        }
        Action::InstallVirus { software_id } => vec![Effect::AttachVirus {
            software_id: software_id.clone(),
            target_server_id: process.target_server_id.clone(),
        }],
        Action::TransferFunds { from_account, to_account, amount_minor } => vec![Effect::BankTransfer {
            transfer_id: format!("tx-{}", process.pid),
            from_account: from_account.clone(),
            to_account: to_account.clone(),
            amount: Money(*amount_minor),
            fee: Money::ZERO,
        }],
        Action::DeleteLog { log_id } => vec![Effect::TombstoneLog { log_id: log_id.clone() }],
        Action::MissionObjective { mission_id, objective_id } => vec![Effect::AdvanceMissionObjective {
            player_id: process.creator_id.clone(),
            mission_id: mission_id.clone(),
            objective_id: objective_id.clone(),
        }],
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
