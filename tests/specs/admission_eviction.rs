// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission-time eviction: when a higher-priority process can't fit
//! against a target's remaining CPU/NET, the engine pauses lower-priority
//! occupants (in priority order) until it fits, rather than rejecting the
//! request outright. RAM deficits are never resolved by eviction.

use crate::prelude::*;
use serde_json::json;

fn port_scan(difficulty: f64) -> (serde_json::Value, serde_json::Value) {
    (json!({"type": "port_scan"}), json!({"effectiveness": 100.0, "target_difficulty": difficulty, "size": 0}))
}

#[tokio::test]
async fn higher_priority_admission_evicts_lower_priority_occupant() {
    // port_scan costs ResourceShare(cpu: 5, ram: 5, net: 15). A target with
    // net capacity 20 admits exactly one before a second needs eviction.
    let daemon = Daemon::spawn(
        Seed::new()
            .player("low", "home-low")
            .player("high", "home-high")
            .server("home-low", "10.0.0.1", 100, 100, 100)
            .server("home-high", "10.0.0.2", 100, 100, 100)
            .server("target-1", "10.0.0.3", 100, 100, 20),
    );

    let (action, inputs) = port_scan(50.0);
    let low = daemon.start_process("low", "target-1", action, 2, inputs).await;
    assert_eq!(low["success"], true);
    let low_pid = low["data"]["pid"].as_str().expect("pid").to_string();

    let low_active = daemon.active_processes("low").await;
    assert_eq!(low_active[0]["state"], "Running", "first admission should run immediately");

    let (action, inputs) = port_scan(50.0);
    let high = daemon.start_process("high", "target-1", action, 9, inputs).await;
    assert_eq!(high["success"], true, "higher-priority admission should succeed via eviction, not be rejected");

    let high_active = daemon.active_processes("high").await;
    assert_eq!(high_active[0]["state"], "Running");

    let low_active = daemon.active_processes("low").await;
    assert_eq!(low_active[0]["pid"], low_pid);
    assert_eq!(low_active[0]["state"], "Paused { reason: Resource }", "lower-priority occupant should be evicted, not cancelled");
}

#[tokio::test]
async fn evicted_process_auto_resumes_once_the_evictor_releases() {
    let daemon = Daemon::spawn(
        Seed::new()
            .player("low", "home-low")
            .player("high", "home-high")
            .server("home-low", "10.0.0.1", 100, 100, 100)
            .server("home-high", "10.0.0.2", 100, 100, 100)
            .server("target-1", "10.0.0.3", 100, 100, 20),
    );

    let (action, inputs) = port_scan(50.0);
    let low = daemon.start_process("low", "target-1", action, 2, inputs).await;
    let low_pid = low["data"]["pid"].as_str().expect("pid").to_string();

    let (action, inputs) = port_scan(50.0);
    let high = daemon.start_process("high", "target-1", action, 9, inputs).await;
    let high_pid = high["data"]["pid"].as_str().expect("pid").to_string();

    let kill = daemon.post(&format!("/processes/{high_pid}/kill"), "high", json!({})).await;
    assert_eq!(kill.status(), 200);

    let resumed = wait_for_async(SPEC_WAIT_MAX_MS, || async {
        let active = daemon.active_processes("low").await;
        active.iter().any(|p| p["pid"] == low_pid && p["state"] == "Running")
    })
    .await;
    assert!(resumed, "evicted process should auto-resume once the evictor's resources are released");
}
