// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects the runtime must execute. These are the atomic steps of the
//! transactional effect layer: balance mutations, log writes, mission
//! progress, and outbound bus publication.

use crate::event::Event;
use crate::money::Money;
use crate::subscription::Channel;
use crate::timer::TimerId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Side effects produced by the process engine and applied by the effect
/// layer. One terminal process transition stages a `Vec<Effect>` that is
/// applied as a single durable transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Credit a player's wallet.
    CreditWallet { player_id: String, amount: Money },

    /// Debit a player's wallet. Fails the transaction if it would violate
    /// the non-negative balance invariant and overdraft isn't authorised.
    DebitWallet { player_id: String, amount: Money },

    /// Apply both legs of a double-entry bank transfer.
    BankTransfer {
        transfer_id: String,
        from_account: String,
        to_account: String,
        amount: Money,
        fee: Money,
    },

    /// Append a typed log entry.
    WriteLog {
        log_id: String,
        category: crate::log_entry::LogCategory,
        player_id: String,
        target_server_id: Option<String>,
        message: String,
    },

    /// Mark log entries as tombstoned (DeleteLog completion effect).
    TombstoneLog { log_id: String },

    /// Advance a mission objective counter for a player.
    AdvanceMissionObjective {
        player_id: String,
        mission_id: String,
        objective_id: String,
    },

    /// Grant the creator a transient credential on a target (Crack
    /// completion effect).
    GrantCredential {
        player_id: String,
        target_server_id: String,
        expires_epoch_ms: u64,
    },

    /// Copy a file to the creator's home server (Download completion
    /// effect).
    CopyFile {
        file_id: String,
        from_server_id: String,
        to_server_id: String,
    },

    /// Place a file on the target server (Upload completion effect).
    PlaceFile { file_id: String, target_server_id: String },

    /// Attach a virus to the target, producing a yield stream
    /// (InstallVirus completion effect).
    AttachVirus {
        software_id: String,
        target_server_id: String,
    },

    /// Adjust reputation for a player in a category.
    AdjustReputation {
        player_id: String,
        category: String,
        delta: i32,
    },

    /// Set a one-shot timer.
    SetTimer { id: TimerId, duration: Duration },

    /// Cancel a timer (idempotent if already fired or absent).
    CancelTimer { id: TimerId },

    /// Stage an event for publication on a channel once the transaction
    /// commits.
    Publish { channel: Channel, event: Event },
}

impl Effect {
    pub fn kind(&self) -> &'static str {
        match self {
            Effect::CreditWallet { .. } => "credit_wallet",
            Effect::DebitWallet { .. } => "debit_wallet",
            Effect::BankTransfer { .. } => "bank_transfer",
            Effect::WriteLog { .. } => "write_log",
            Effect::TombstoneLog { .. } => "tombstone_log",
            Effect::AdvanceMissionObjective { .. } => "advance_mission_objective",
            Effect::GrantCredential { .. } => "grant_credential",
            Effect::CopyFile { .. } => "copy_file",
            Effect::PlaceFile { .. } => "place_file",
            Effect::AttachVirus { .. } => "attach_virus",
            Effect::AdjustReputation { .. } => "adjust_reputation",
            Effect::SetTimer { .. } => "set_timer",
            Effect::CancelTimer { .. } => "cancel_timer",
            Effect::Publish { .. } => "publish",
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
