// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared channel subscription index.
//!
//! Mutations (subscribe/unsubscribe/register/remove) are expected to be
//! serialised through the engine's command queue per the concurrency
//! model; the index itself only needs a lock to protect the handful of
//! maps below, not to arbitrate between writers.

use crate::connection::{EnqueueOutcome, OutboundQueue};
use crate::protocol::{frame_for_event, ServerFrame};
use breach_core::{Channel, ConnectionId, Event};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

#[derive(Default)]
pub struct ChannelRegistry {
    channels: RwLock<HashMap<Channel, HashSet<ConnectionId>>>,
    outbound: RwLock<HashMap<ConnectionId, OutboundQueue>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly authenticated connection's outbound queue. Callers
    /// subscribe it to `user:<player_id>` separately via [`Self::subscribe`].
    pub fn register_connection(&self, connection_id: ConnectionId, queue: OutboundQueue) {
        self.outbound.write().insert(connection_id, queue);
    }

    /// Drop a connection and remove it from every channel it had joined.
    pub fn remove_connection(&self, connection_id: &ConnectionId) {
        self.outbound.write().remove(connection_id);
        let mut channels = self.channels.write();
        channels.retain(|_, members| {
            members.remove(connection_id);
            !members.is_empty()
        });
    }

    pub fn subscribe(&self, connection_id: &ConnectionId, channel: Channel) {
        self.channels.write().entry(channel).or_default().insert(connection_id.clone());
    }

    pub fn unsubscribe(&self, connection_id: &ConnectionId, channel: &Channel) {
        if let Some(members) = self.channels.write().get_mut(channel) {
            members.remove(connection_id);
        }
    }

    pub fn is_subscribed(&self, connection_id: &ConnectionId, channel: &Channel) -> bool {
        self.channels.read().get(channel).map(|members| members.contains(connection_id)).unwrap_or(false)
    }

    /// Enqueue `frame` on every connection currently subscribed to
    /// `channel`. Connections whose queue reports `Closed` are returned so
    /// the caller can tear them down with `POLICY_VIOLATION`.
    pub fn publish_frame(&self, channel: &Channel, frame: ServerFrame) -> Vec<ConnectionId> {
        let members = self.channels.read().get(channel).cloned().unwrap_or_default();
        let outbound = self.outbound.read();
        let mut to_close = Vec::new();
        for connection_id in members {
            if let Some(queue) = outbound.get(&connection_id) {
                if queue.enqueue(frame.clone()) == EnqueueOutcome::Closed {
                    to_close.push(connection_id);
                }
            }
        }
        to_close
    }

    /// Translate a durable event into its client-facing frame (if any) and
    /// publish it on `channel`.
    pub fn publish_event(&self, channel: &Channel, event: &Event) -> Vec<ConnectionId> {
        match frame_for_event(event) {
            Some(frame) => self.publish_frame(channel, frame),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
