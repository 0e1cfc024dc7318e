// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turns staged `Effect`s into the `Event`s a single durable transaction
//! commits.
//!
//! `resolve` is pure: it validates cross-entity invariants against a
//! `MaterializedState` snapshot and returns the events the transaction would
//! append, plus the subset staged for outbound bus delivery. It mutates
//! nothing — the caller appends the returned events to the durable store
//! and folds them into its own state with `MaterializedState::apply_event`,
//! the same path WAL replay uses, so effect application and crash recovery
//! can never disagree about the result.
//!
//! `GrantCredential`, `CopyFile`, `PlaceFile`, and `AttachVirus` reference
//! entities (credentials, files, viruses) outside the durable data model;
//! they're recorded as `Event::LogWritten` audit entries rather than
//! dedicated mutations.

use breach_core::log_entry::LogCategory;
use breach_core::{Channel, Effect, Event, MissionStatus, Money};
use breach_storage::MaterializedState;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EffectError {
    #[error("bank account not found: {0}")]
    AccountNotFound(String),
    #[error("transfer from {account} would overdraw by {deficit} minor units")]
    InsufficientFunds { account: String, deficit: i64 },
}

/// The outcome of resolving a batch of effects: events to commit durably,
/// and the subset to additionally publish on the bus once committed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResolvedEffects {
    pub events: Vec<Event>,
    pub outbound: Vec<(Channel, Event)>,
}

pub fn resolve(effects: &[Effect], state: &MaterializedState, now_epoch_ms: u64) -> Result<ResolvedEffects, EffectError> {
    let mut resolved = ResolvedEffects::default();
    // Objective counts as advanced so far within this batch, keyed by
    // (player_id, mission_id), seeded from durable state on first touch.
    // Lets several objectives of the same mission advance in one batch
    // without re-reading state and without staging `MissionCompleted` twice.
    let mut mission_progress: HashMap<(String, String), HashMap<String, u32>> = HashMap::new();

    for effect in effects {
        match effect {
            Effect::CreditWallet { player_id, amount } => {
                resolved.events.push(Event::WalletCredited {
                    player_id: player_id.clone(),
                    amount_minor: amount.minor_units(),
                });
            }

            Effect::DebitWallet { player_id, amount } => {
                let player = state.players.get(player_id);
                let balance = player.map(|p| p.wallet_balance).unwrap_or(Money::ZERO);
                if balance.checked_sub(*amount).is_none_or(|b| b.is_negative()) {
                    return Err(EffectError::InsufficientFunds {
                        account: player_id.clone(),
                        deficit: (amount.minor_units() - balance.minor_units()).max(0),
                    });
                }
                resolved.events.push(Event::WalletDebited {
                    player_id: player_id.clone(),
                    amount_minor: amount.minor_units(),
                });
            }

            Effect::BankTransfer { transfer_id, from_account, to_account, amount, fee } => {
                let from = state
                    .bank_accounts
                    .get(from_account)
                    .ok_or_else(|| EffectError::AccountNotFound(from_account.clone()))?;
                let total_debit = *amount + *fee;
                if !from.can_debit(total_debit) {
                    let deficit = (total_debit - from.balance).minor_units();
                    return Err(EffectError::InsufficientFunds { account: from_account.clone(), deficit });
                }
                resolved.events.push(Event::BankTransfer {
                    transfer_id: transfer_id.clone(),
                    from_account: from_account.clone(),
                    to_account: to_account.clone(),
                    amount_minor: amount.minor_units(),
                    fee_minor: fee.minor_units(),
                });
            }

            Effect::WriteLog { log_id, category, player_id, target_server_id, message } => {
                resolved.events.push(Event::LogWritten {
                    log_id: log_id.clone(),
                    category: *category,
                    player_id: player_id.clone(),
                    target_server_id: target_server_id.clone(),
                    message: message.clone(),
                    epoch_ms: now_epoch_ms,
                });
            }

            Effect::TombstoneLog { log_id } => {
                resolved.events.push(Event::LogTombstoned { log_id: log_id.clone() });
            }

            Effect::AdvanceMissionObjective { player_id, mission_id, objective_id } => {
                let Some(template) = state.mission_templates.get(mission_id) else { continue };
                let Some(objective) = template.objectives.iter().find(|o| &o.objective_id == objective_id) else {
                    continue;
                };
                let Some(user_mission) = state.get_user_mission(player_id, mission_id) else { continue };
                if user_mission.status != MissionStatus::Active {
                    continue;
                }

                let progress = mission_progress
                    .entry((player_id.clone(), mission_id.clone()))
                    .or_insert_with(|| user_mission.objective_progress.clone());
                let count = progress.entry(objective_id.clone()).or_insert(0);
                if *count >= objective.required_count {
                    continue;
                }
                *count += 1;

                resolved.events.push(Event::MissionAdvanced {
                    player_id: player_id.clone(),
                    mission_id: mission_id.clone(),
                    objective_id: objective_id.clone(),
                });

                let complete =
                    template.objectives.iter().all(|o| progress.get(&o.objective_id).copied().unwrap_or(0) >= o.required_count);
                if complete {
                    resolved.events.push(Event::MissionCompleted { player_id: player_id.clone(), mission_id: mission_id.clone() });
                    if template.reward_money_minor != 0 {
                        resolved.events.push(Event::WalletCredited {
                            player_id: player_id.clone(),
                            amount_minor: template.reward_money_minor,
                        });
                    }
                    let stats_update = Event::StatsUpdate { player_id: player_id.clone() };
                    let notification = Event::Notification {
                        player_id: player_id.clone(),
                        message: format!("Mission {mission_id} completed"),
                    };
                    resolved.events.push(stats_update.clone());
                    resolved.events.push(notification.clone());
                    resolved.outbound.push((Channel::user(player_id.clone()), stats_update));
                    resolved.outbound.push((Channel::user(player_id.clone()), notification));
                }
            }

            Effect::AdjustReputation { player_id, category, delta } => {
                resolved.events.push(Event::ReputationAdjusted {
                    player_id: player_id.clone(),
                    category: category.clone(),
                    delta: *delta,
                });
            }

            Effect::GrantCredential { player_id, target_server_id, expires_epoch_ms } => {
                resolved.events.push(Event::LogWritten {
                    log_id: format!("log-credential-{player_id}-{target_server_id}-{now_epoch_ms}"),
                    category: LogCategory::Hacking,
                    player_id: player_id.clone(),
                    target_server_id: Some(target_server_id.clone()),
                    message: format!("credential granted on {target_server_id}, expires {expires_epoch_ms}"),
                    epoch_ms: now_epoch_ms,
                });
            }

            Effect::CopyFile { file_id, from_server_id, to_server_id } => {
                resolved.events.push(Event::LogWritten {
                    log_id: format!("log-copy-{file_id}-{now_epoch_ms}"),
                    category: LogCategory::Action,
                    player_id: String::new(),
                    target_server_id: Some(from_server_id.clone()),
                    message: format!("file {file_id} copied from {from_server_id} to {to_server_id}"),
                    epoch_ms: now_epoch_ms,
                });
            }

            Effect::PlaceFile { file_id, target_server_id } => {
                resolved.events.push(Event::LogWritten {
                    log_id: format!("log-place-{file_id}-{now_epoch_ms}"),
                    category: LogCategory::Action,
                    player_id: String::new(),
                    target_server_id: Some(target_server_id.clone()),
                    message: format!("file {file_id} placed on {target_server_id}"),
                    epoch_ms: now_epoch_ms,
                });
            }

            Effect::AttachVirus { software_id, target_server_id } => {
                resolved.events.push(Event::LogWritten {
                    log_id: format!("log-virus-{software_id}-{now_epoch_ms}"),
                    category: LogCategory::Security,
                    player_id: String::new(),
                    target_server_id: Some(target_server_id.clone()),
                    message: format!("virus {software_id} attached to {target_server_id}"),
                    epoch_ms: now_epoch_ms,
                });
            }

            Effect::Publish { channel, event } => {
                resolved.outbound.push((channel.clone(), event.clone()));
            }

            // Timers aren't durable events; the scheduler owns them directly.
            Effect::SetTimer { .. } | Effect::CancelTimer { .. } => {}
        }
    }

    Ok(resolved)
}

#[cfg(test)]
#[path = "effect_apply_tests.rs"]
mod tests;
