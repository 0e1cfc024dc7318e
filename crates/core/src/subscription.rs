// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus channel naming and per-connection subscription state.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

crate::define_id! {
    #[derive(Default)]
    pub struct ConnectionId;
}

/// A bus channel scope. Serializes to/from the wire string form
/// (`user:<id>`, `clan:<id>`, `global`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Channel {
    User(String),
    Clan(String),
    Global,
}

impl Channel {
    pub fn user(player_id: impl Into<String>) -> Self {
        Channel::User(player_id.into())
    }

    pub fn clan(clan_id: impl Into<String>) -> Self {
        Channel::Clan(clan_id.into())
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::User(id) => write!(f, "user:{id}"),
            Channel::Clan(id) => write!(f, "clan:{id}"),
            Channel::Global => write!(f, "global"),
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "global" {
            Ok(Channel::Global)
        } else if let Some(id) = s.strip_prefix("user:") {
            Ok(Channel::User(id.to_string()))
        } else if let Some(id) = s.strip_prefix("clan:") {
            Ok(Channel::Clan(id.to_string()))
        } else {
            Err(format!("unrecognised channel: {s}"))
        }
    }
}

impl TryFrom<String> for Channel {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Channel> for String {
    fn from(channel: Channel) -> String {
        channel.to_string()
    }
}

/// Per-connection subscription state owned by the bus.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub connection_id: String,
    pub player_id: String,
    pub channels: HashSet<Channel>,
    pub last_client_seen_epoch_ms: u64,
    pub last_pong_epoch_ms: u64,
}

impl Subscription {
    /// New subscription immediately after a successful auth handshake:
    /// `user:<player_id>` is always present.
    pub fn authenticated(connection_id: impl Into<String>, player_id: impl Into<String>, now_epoch_ms: u64) -> Self {
        let player_id = player_id.into();
        let mut channels = HashSet::new();
        channels.insert(Channel::user(player_id.clone()));
        Self {
            connection_id: connection_id.into(),
            player_id,
            channels,
            last_client_seen_epoch_ms: now_epoch_ms,
            last_pong_epoch_ms: now_epoch_ms,
        }
    }

    pub fn is_subscribed(&self, channel: &Channel) -> bool {
        self.channels.contains(channel)
    }

    pub fn subscribe(&mut self, channel: Channel) {
        self.channels.insert(channel);
    }

    pub fn unsubscribe(&mut self, channel: &Channel) {
        self.channels.remove(channel);
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
