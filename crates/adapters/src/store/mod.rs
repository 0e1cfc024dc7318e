// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable storage adapters.

mod noop;
mod wal_backed;

pub use noop::NoOpStore;
pub use wal_backed::WalBackedStore;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeStore;

use breach_core::Event;
use breach_storage::MaterializedState;
use thiserror::Error;

/// Errors from durable store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("wal error: {0}")]
    Wal(#[from] breach_storage::WalError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] breach_storage::SnapshotError),
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] breach_storage::CheckpointError),
}

/// Durable store for the process engine: appends events to a write-ahead
/// log, periodically checkpoints the materialized state, and replays on
/// startup. The engine never touches a `Wal`/`Checkpointer` directly —
/// only through this trait, so tests can swap in an in-memory fake.
pub trait DurableStore: Send + 'static {
    /// Durably append an event, returning its assigned sequence number.
    /// Not guaranteed flushed to disk until `flush()` is called.
    fn append(&mut self, event: &Event) -> Result<u64, StoreError>;

    /// Force any buffered events to disk.
    fn flush(&mut self) -> Result<(), StoreError>;

    /// Replay snapshot + WAL into a fresh `MaterializedState`, returning the
    /// state and the WAL sequence recovery should resume from.
    fn recover(&mut self) -> Result<(MaterializedState, u64), StoreError>;

    /// Checkpoint the given state at `seq` and truncate the WAL up to it.
    /// Blocks until the snapshot is durable before truncating.
    fn checkpoint(&mut self, seq: u64, state: &MaterializedState) -> Result<(), StoreError>;
}
