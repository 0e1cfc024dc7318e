// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the realtime event bus.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("auth frame not received within the handshake window")]
    AuthTimeout,
    #[error("auth rejected: {0}")]
    AuthRejected(String),
    #[error("not subscribed to a clan channel without confirmed membership")]
    NotAClanMember,
    #[error("connection closed")]
    ConnectionClosed,
    #[error("frame decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
