// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory durable store for testing.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{DurableStore, StoreError};
use breach_core::Event;
use breach_storage::MaterializedState;

/// Records every appended event and replays them on `recover()`, so tests
/// can assert on exactly what the engine tried to persist.
#[derive(Default)]
pub struct FakeStore {
    events: Vec<(u64, Event)>,
    next_seq: u64,
    checkpoints: Vec<u64>,
    flush_count: u32,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn appended(&self) -> &[(u64, Event)] {
        &self.events
    }

    pub fn checkpoints(&self) -> &[u64] {
        &self.checkpoints
    }

    pub fn flush_count(&self) -> u32 {
        self.flush_count
    }
}

impl DurableStore for FakeStore {
    fn append(&mut self, event: &Event) -> Result<u64, StoreError> {
        self.next_seq += 1;
        self.events.push((self.next_seq, event.clone()));
        Ok(self.next_seq)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.flush_count += 1;
        Ok(())
    }

    fn recover(&mut self) -> Result<(MaterializedState, u64), StoreError> {
        let mut state = MaterializedState::default();
        let mut last_seq = 0;
        for (seq, event) in &self.events {
            state.apply_event(event);
            last_seq = *seq;
        }
        Ok((state, last_seq))
    }

    fn checkpoint(&mut self, seq: u64, _state: &MaterializedState) -> Result<(), StoreError> {
        self.checkpoints.push(seq);
        self.events.retain(|(s, _)| *s > seq);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
