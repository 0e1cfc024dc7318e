// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server entity: the hackable unit of hardware, owned by a player or seeded
//! as an NPC target.

use crate::resource::ResourceShare;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a server.
    #[derive(Default)]
    pub struct ServerId;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerLocation {
    pub country_code: String,
    pub city: String,
}

/// A server: a player's home machine, a second server, or an NPC target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub server_id: String,
    pub owner_id: Option<String>,
    pub ip: String,
    pub capacity: ResourceShare,
    pub firewall_level: u32,
    pub online: bool,
    pub password_hash: Option<String>,
    pub location: Option<ServerLocation>,
    pub current_connections: u32,
    pub max_connections: u32,
    pub monitoring_level: u32,
}

impl Server {
    pub fn new(server_id: impl Into<String>, ip: impl Into<String>, capacity: ResourceShare) -> Self {
        Self {
            server_id: server_id.into(),
            owner_id: None,
            ip: ip.into(),
            capacity,
            firewall_level: 0,
            online: true,
            password_hash: None,
            location: None,
            current_connections: 0,
            max_connections: 8,
            monitoring_level: 0,
        }
    }

    pub fn has_connection_slot(&self) -> bool {
        self.current_connections < self.max_connections
    }

    /// True if the declared connections invariant holds (`current <= max`).
    pub fn connections_within_bounds(&self) -> bool {
        self.current_connections <= self.max_connections
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
