// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op publisher: discards every event. Used when the bus is disabled.

use super::{EventPublisher, PublishError};
use async_trait::async_trait;
use breach_core::{Channel, Event};

#[derive(Debug, Default, Clone)]
pub struct NoOpPublisher;

impl NoOpPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for NoOpPublisher {
    async fn publish(&self, _channel: &Channel, _event: &Event) -> Result<(), PublishError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
