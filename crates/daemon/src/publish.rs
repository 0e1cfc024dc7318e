// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The bus-backed `EventPublisher`. Lives here rather than in
//! `breach-adapters` so that crate doesn't need to depend on `breach-bus`.

use async_trait::async_trait;
use breach_adapters::{EventPublisher, PublishError};
use breach_bus::ChannelRegistry;
use breach_core::{Channel, Event};
use std::sync::Arc;

pub struct BusPublisher {
    registry: Arc<ChannelRegistry>,
}

impl BusPublisher {
    pub fn new(registry: Arc<ChannelRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl EventPublisher for BusPublisher {
    async fn publish(&self, channel: &Channel, event: &Event) -> Result<(), PublishError> {
        // Connections the registry reports as force-closed by backpressure
        // tear themselves down on their own `recv` loop; nothing more to do.
        self.registry.publish_event(channel, event);
        Ok(())
    }
}

#[cfg(test)]
#[path = "publish_tests.rs"]
mod tests;
