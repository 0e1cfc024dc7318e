// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-tick detection roll.
//!
//! A roll never pauses or cancels anything by itself — it only raises
//! `Process::detection_risk` and, on trigger, hands the caller a
//! `SecurityEvent` to stage for the victim's channel. Sourced randomness
//! goes through `RollSource` so tests can pin the outcome, the same way
//! duration accounting goes through `Clock`.

use breach_core::process::Action;
use breach_core::{Event, Process};

/// A source of uniform samples in `[0.0, 1.0)`.
pub trait RollSource: Send + Sync + 'static {
    fn sample(&self) -> f64;
}

/// Production source backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRollSource;

impl RollSource for ThreadRollSource {
    fn sample(&self) -> f64 {
        use rand::Rng;
        rand::rng().random::<f64>()
    }
}

/// How easily an action's signature stands out to a target's monitoring.
fn sensitivity(action: &Action) -> f64 {
    match action {
        Action::PortScan => 0.2,
        Action::Crack => 0.5,
        Action::Download { .. } => 0.3,
        Action::Upload { .. } => 0.3,
        Action::InstallVirus { .. } => 0.8,
        Action::TransferFunds { .. } => 0.1,
        Action::DeleteLog { .. } => 0.6,
        Action::MissionObjective { .. } => 0.0,
    }
}

/// Probability of detection this tick, increasing with the target's
/// monitoring level and the action's sensitivity, decreasing with the
/// process's stealth. Clamped to `[0.0, 1.0]`.
fn detection_probability(stealth_level: u8, monitoring_level: u32, action: &Action) -> f64 {
    let stealth = (stealth_level as f64 / 100.0).clamp(0.0, 1.0);
    let monitoring = (monitoring_level as f64 / 100.0).clamp(0.0, 1.0);
    (monitoring * sensitivity(action) * (1.0 - stealth)).clamp(0.0, 1.0)
}

pub struct DetectionRoll {
    pub triggered: bool,
    pub risk_delta: f64,
    pub event: Option<Event>,
}

/// Roll detection for a single running process against its target's current
/// monitoring level. `victim_id` is the player who owns the target server,
/// resolved by the caller.
pub fn roll(process: &Process, monitoring_level: u32, victim_id: &str, source: &dyn RollSource) -> DetectionRoll {
    let probability = detection_probability(process.stealth_level, monitoring_level, &process.action);
    let sample = source.sample();
    let triggered = sample < probability;

    let event = triggered.then(|| Event::SecurityEvent {
        victim_id: victim_id.to_string(),
        pid: process.pid.clone(),
        actor_stealth: process.stealth_level as f64,
        message: format!("suspicious activity detected on your server from process {}", process.pid),
        risk_delta: probability,
    });

    DetectionRoll { triggered, risk_delta: probability, event }
}

#[cfg(any(test, feature = "test-support"))]
pub struct FixedRollSource(pub f64);

#[cfg(any(test, feature = "test-support"))]
impl RollSource for FixedRollSource {
    fn sample(&self) -> f64 {
        self.0
    }
}

#[cfg(test)]
#[path = "detection_tests.rs"]
mod tests;
