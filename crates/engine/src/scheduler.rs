// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer wheel: one-shot wake-ups keyed by `TimerId`.
//!
//! The engine never calls `Instant::now()` directly here either — callers
//! pass in the `Clock`-derived instant, so the scheduler itself stays
//! deterministic under `FakeClock` in tests.

use breach_core::TimerId;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Timer {
    fires_at: Instant,
}

/// At most one timer exists per `TimerId` at any moment; setting a timer
/// that already exists replaces its deadline.
#[derive(Debug, Default)]
pub struct Scheduler {
    timers: HashMap<TimerId, Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, id: TimerId, duration: Duration, now: Instant) {
        self.timers.insert(id, Timer { fires_at: now + duration });
    }

    /// Idempotent: cancelling an absent or already-fired timer is a no-op.
    pub fn cancel(&mut self, id: &TimerId) {
        self.timers.remove(id);
    }

    /// Cancel every timer scoped to `pid` (completion, progress-tick,
    /// detection-roll) in one call, used when a process reaches a terminal
    /// state.
    pub fn cancel_all_for_pid(&mut self, pid: &str) {
        self.timers.retain(|id, _| id.pid_str() != Some(pid));
    }

    /// Drain and return every timer whose deadline has passed.
    pub fn fired(&mut self, now: Instant) -> Vec<TimerId> {
        let fired: Vec<TimerId> = self
            .timers
            .iter()
            .filter(|(_, t)| t.fires_at <= now)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &fired {
            self.timers.remove(id);
        }
        fired
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().map(|t| t.fires_at).min()
    }

    pub fn has_timers(&self) -> bool {
        !self.timers.is_empty()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
