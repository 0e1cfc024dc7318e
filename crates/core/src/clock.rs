// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monotonic clock abstraction used for all duration accounting.
//!
//! The engine never calls `Instant::now()`/`SystemTime::now()` directly —
//! every duration-sensitive decision (timer scheduling, progress accounting,
//! pause bookkeeping) goes through a `Clock` so tests can advance time
//! deterministically without sleeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A source of monotonic time and wall-clock epoch milliseconds.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Monotonic instant used for all interval arithmetic (never goes
    /// backwards, immune to wall-clock adjustments).
    fn now(&self) -> Instant;

    /// Wall-clock milliseconds since the Unix epoch, for persisted
    /// timestamps (log entries, event payloads).
    fn epoch_ms(&self) -> u64;
}

/// Production clock backed by the OS monotonic/wall clocks.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Deterministic clock for tests. Starts at `Instant::now()` at construction
/// and only advances when `advance()` is called explicitly.
#[derive(Clone)]
pub struct FakeClock {
    base: Instant,
    offset_ms: Arc<AtomicU64>,
    epoch_base_ms: u64,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset_ms: Arc::new(AtomicU64::new(0)),
            epoch_base_ms: 1_700_000_000_000,
        }
    }

    /// Advance the fake clock by `d`.
    pub fn advance(&self, d: Duration) {
        self.offset_ms
            .fetch_add(d.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.base + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }

    fn epoch_ms(&self) -> u64 {
        self.epoch_base_ms + self.offset_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
