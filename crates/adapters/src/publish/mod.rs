// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publishing adapters for the realtime event bus.
//!
//! The real bus-backed publisher lives in the daemon crate, which owns the
//! channel registry and WebSocket connections; implementing
//! [`EventPublisher`] there avoids a dependency cycle between this crate and
//! the bus crate.

mod noop;

pub use noop::NoOpPublisher;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePublisher, PublishCall};

use async_trait::async_trait;
use breach_core::{Channel, Event};
use thiserror::Error;

/// Errors from publish operations.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish failed: {0}")]
    SendFailed(String),
}

/// Adapter for pushing an event onto a bus channel.
#[async_trait]
pub trait EventPublisher: Send + Sync + 'static {
    async fn publish(&self, channel: &Channel, event: &Event) -> Result<(), PublishError>;
}
