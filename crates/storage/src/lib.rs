// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Storage layer: WAL, snapshots, background checkpointing, and the
//! materialized state they rebuild on recovery.

mod checkpoint;
mod migration;
mod snapshot;
mod state;
mod wal;

pub use checkpoint::{
    CheckpointError, CheckpointHandle, CheckpointResult, CheckpointWriter, Checkpointer, FsCheckpointWriter,
    load_snapshot,
};
pub use migration::{Migration, MigrationError, MigrationRegistry};
pub use snapshot::{Snapshot, SnapshotError, CURRENT_SNAPSHOT_VERSION};
pub use state::MaterializedState;
pub use wal::{Wal, WalEntry, WalError};
