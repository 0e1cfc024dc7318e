// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake publisher for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{EventPublisher, PublishError};
use async_trait::async_trait;
use breach_core::{Channel, Event};
use parking_lot::Mutex;
use std::sync::Arc;

/// Recorded publish call
#[derive(Debug, Clone)]
pub struct PublishCall {
    pub channel: Channel,
    pub event: Event,
}

struct FakePublisherState {
    calls: Vec<PublishCall>,
}

/// Fake publisher that records every call instead of reaching the bus.
#[derive(Clone)]
pub struct FakePublisher {
    inner: Arc<Mutex<FakePublisherState>>,
}

impl Default for FakePublisher {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakePublisherState { calls: Vec::new() })),
        }
    }
}

impl FakePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<PublishCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl EventPublisher for FakePublisher {
    async fn publish(&self, channel: &Channel, event: &Event) -> Result<(), PublishError> {
        self.inner.lock().calls.push(PublishCall {
            channel: channel.clone(),
            event: event.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
