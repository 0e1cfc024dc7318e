// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Player identity, progression, and reputation.

use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

crate::define_id! {
    /// Unique identifier for a player account.
    #[derive(Default)]
    pub struct PlayerId;
}

/// Reputation tracked per category (e.g. "hacking", "trading", "clan").
/// Clamped to `[-1000, 1000]` on every mutation.
pub const REPUTATION_MIN: i32 = -1000;
pub const REPUTATION_MAX: i32 = 1000;

pub fn clamp_reputation(value: i32) -> i32 {
    value.clamp(REPUTATION_MIN, REPUTATION_MAX)
}

/// A player account. Never destroyed; bans soft-deactivate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub player_id: String,
    pub login: String,
    pub wallet_balance: Money,
    pub experience: u64,
    pub level: u32,
    #[serde(default)]
    pub reputation: HashMap<String, i32>,
    pub premium: bool,
    pub home_server_id: String,
    #[serde(default)]
    pub deactivated: bool,
}

/// Experience-to-level curve. Monotonic non-decreasing by construction:
/// each threshold is strictly larger than the last, and the function
/// returns the count of thresholds crossed.
fn level_thresholds() -> &'static [u64] {
    const THRESHOLDS: [u64; 10] = [
        0, 1_000, 3_000, 7_000, 15_000, 30_000, 60_000, 120_000, 250_000, 500_000,
    ];
    &THRESHOLDS
}

pub fn level_for_experience(experience: u64) -> u32 {
    level_thresholds()
        .iter()
        .filter(|&&t| experience >= t)
        .count() as u32
}

impl Player {
    pub fn new(player_id: impl Into<String>, login: impl Into<String>, home_server_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            login: login.into(),
            wallet_balance: Money::ZERO,
            experience: 0,
            level: level_for_experience(0),
            reputation: HashMap::new(),
            premium: false,
            home_server_id: home_server_id.into(),
            deactivated: false,
        }
    }

    /// Grant experience and recompute the derived level.
    pub fn grant_experience(&mut self, amount: u64) {
        self.experience += amount;
        self.level = level_for_experience(self.experience);
    }

    pub fn reputation_in(&self, category: &str) -> i32 {
        self.reputation.get(category).copied().unwrap_or(0)
    }

    /// Adjust reputation in a category, clamping to the documented range.
    pub fn adjust_reputation(&mut self, category: &str, delta: i32) {
        let entry = self.reputation.entry(category.to_string()).or_insert(0);
        *entry = clamp_reputation(*entry + delta);
    }
}

#[cfg(test)]
#[path = "player_tests.rs"]
mod tests;
