// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the process engine.

use breach_adapters::StoreError;
use thiserror::Error;

/// Errors that can occur while the engine processes a command.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("process not found: {0}")]
    ProcessNotFound(String),
    #[error("server not found: {0}")]
    ServerNotFound(String),
    #[error("invalid transition for pid {pid}: {reason}")]
    InvalidTransition { pid: String, reason: &'static str },
    #[error("durable store unavailable: {0}")]
    DurableStoreUnavailable(#[from] StoreError),
}
