// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup (crash recovery via WAL replay) and graceful shutdown.

use crate::env::Config;
use breach_adapters::{DurableStore, StoreError, WalBackedStore};
use breach_storage::MaterializedState;
use std::time::Instant;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable state and bookkeeping handed back to `main` after startup.
pub struct StartupResult {
    pub store: WalBackedStore,
    pub state: MaterializedState,
    /// WAL sequence the replayed state reflects; the next checkpoint starts from here.
    pub recovered_seq: u64,
    pub start_time: Instant,
}

/// Create the state/log directories if needed, open the WAL-backed store,
/// and replay snapshot + WAL tail into a fresh `MaterializedState`.
pub fn startup(config: &Config) -> Result<StartupResult, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;
    std::fs::create_dir_all(&config.log_dir)?;
    if let Some(parent) = config.wal_path().parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut store = WalBackedStore::open(&config.wal_path(), &config.snapshot_path())?;
    let (state, recovered_seq) = store.recover()?;
    info!(
        recovered_seq,
        processes = state.processes.len(),
        players = state.players.len(),
        servers = state.servers.len(),
        "recovered durable state"
    );

    Ok(StartupResult { store, state, recovered_seq, start_time: Instant::now() })
}

/// Flush any buffered WAL writes and, if there's anything new to persist,
/// checkpoint the current state so the next startup has less to replay.
pub fn shutdown(store: &mut WalBackedStore, state: &MaterializedState, processed_seq: u64) -> Result<(), LifecycleError> {
    info!("shutting down daemon");
    store.flush()?;
    if processed_seq > 0 {
        store.checkpoint(processed_seq, state)?;
        info!(processed_seq, "saved shutdown checkpoint");
    }
    Ok(())
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
