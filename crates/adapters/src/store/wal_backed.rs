// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Production `DurableStore`: WAL + background zstd checkpointing.

use super::{DurableStore, StoreError};
use breach_core::Event;
use breach_storage::{load_snapshot, Checkpointer, MaterializedState, Wal};
use std::path::{Path, PathBuf};

pub struct WalBackedStore {
    wal: Wal,
    checkpointer: Checkpointer,
    #[allow(dead_code)]
    snapshot_path: PathBuf,
    /// Replay result computed in `open()`, handed out exactly once by `recover()`.
    pending_recovery: Option<(MaterializedState, u64)>,
}

impl WalBackedStore {
    /// Open (or create) the WAL and snapshot at the given paths, replaying
    /// snapshot + WAL tail into a fresh `MaterializedState`.
    pub fn open(wal_path: &Path, snapshot_path: &Path) -> Result<Self, StoreError> {
        let snapshot = load_snapshot(snapshot_path)?;
        let (mut state, snapshot_seq) = match snapshot {
            Some(s) => (s.state, s.seq),
            None => (MaterializedState::default(), 0),
        };

        let wal = Wal::open(wal_path, snapshot_seq)?;
        let mut last_seq = snapshot_seq;
        for entry in wal.entries_after(snapshot_seq)? {
            state.apply_event(&entry.event);
            last_seq = entry.seq;
        }

        let checkpointer = Checkpointer::new(snapshot_path.to_path_buf());

        Ok(Self {
            wal,
            checkpointer,
            snapshot_path: snapshot_path.to_path_buf(),
            pending_recovery: Some((state, last_seq)),
        })
    }
}

impl DurableStore for WalBackedStore {
    fn append(&mut self, event: &Event) -> Result<u64, StoreError> {
        Ok(self.wal.append(event)?)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(self.wal.flush()?)
    }

    fn recover(&mut self) -> Result<(MaterializedState, u64), StoreError> {
        match self.pending_recovery.take() {
            Some(result) => Ok(result),
            // Already recovered once at open(); a second call has nothing
            // new to replay beyond the WAL's own processed_seq bookkeeping.
            None => Ok((MaterializedState::default(), self.wal.processed_seq())),
        }
    }

    fn checkpoint(&mut self, seq: u64, state: &MaterializedState) -> Result<(), StoreError> {
        let handle = self.checkpointer.start(seq, state);
        handle.wait().map_err(StoreError::Checkpoint)?;
        self.wal.truncate_before(seq)?;
        self.wal.mark_processed(seq);
        Ok(())
    }
}

#[cfg(test)]
#[path = "wal_backed_tests.rs"]
mod tests;
