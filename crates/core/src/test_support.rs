// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind the `test-support` feature.

use crate::clock::FakeClock;
use crate::process::{Action, Process, ProcessConfig};
use crate::resource::ResourceShare;
use crate::server::Server;
use crate::Player;

pub fn fixture_player(player_id: &str, home_server_id: &str) -> Player {
    Player::new(player_id, format!("{player_id}_login"), home_server_id)
}

pub fn fixture_server(server_id: &str, ip: &str) -> Server {
    Server::new(server_id, ip, ResourceShare::new(100, 100, 100))
}

pub fn fixture_process_config(pid: &str, creator_id: &str, target_server_id: &str) -> ProcessConfig {
    ProcessConfig {
        id: pid.to_string(),
        creator_id: creator_id.to_string(),
        target_server_id: target_server_id.to_string(),
        action: Action::PortScan,
        software_id: None,
        resource_request: ResourceShare::new(10, 10, 10),
        ideal_duration_seconds: 60,
        parent_pid: None,
        priority: 5,
        stealth_level: 5,
    }
}

pub fn fixture_process(pid: &str, creator_id: &str, target_server_id: &str, clock: &FakeClock) -> Process {
    Process::new(fixture_process_config(pid, creator_id, target_server_id), clock)
}
