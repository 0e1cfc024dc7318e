// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op durable store: discards every event. Used when persistence is
//! disabled or not yet configured.

use super::{DurableStore, StoreError};
use breach_core::Event;
use breach_storage::MaterializedState;

#[derive(Debug, Default)]
pub struct NoOpStore {
    next_seq: u64,
}

impl NoOpStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for NoOpStore {
    fn append(&mut self, _event: &Event) -> Result<u64, StoreError> {
        self.next_seq += 1;
        Ok(self.next_seq)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn recover(&mut self) -> Result<(MaterializedState, u64), StoreError> {
        Ok((MaterializedState::default(), 0))
    }

    fn checkpoint(&mut self, _seq: u64, _state: &MaterializedState) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
