// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-process start -> progress -> pause -> resume -> completion, and
//! cancel-from-running. Covers the resource-conservation and
//! progress-never-regresses properties for the common case of one process
//! with no contention.

use crate::prelude::*;
use serde_json::json;

/// A `Crack` at `effectiveness: 100, target_difficulty: 1` resolves to the
/// formula's duration floor ratio (0.1) against the 60s base, i.e. 6s.
fn short_crack() -> serde_json::Value {
    json!({"effectiveness": 100.0, "target_difficulty": 1.0, "size": 0})
}

#[tokio::test]
async fn start_reports_active_then_completes() {
    let daemon = Daemon::spawn(Seed::new().player("alice", "home-1").server("home-1", "10.0.0.1", 100, 100, 100).server("target-1", "10.0.0.2", 100, 100, 100));

    let start = daemon.start_process("alice", "target-1", json!({"type": "crack"}), 5, short_crack()).await;
    assert_eq!(start["success"], true);
    let pid = start["data"]["pid"].as_str().expect("pid").to_string();

    let active = daemon.active_processes("alice").await;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["pid"], pid);
    assert_eq!(active[0]["state"], "Running");

    let completed = wait_for_async(SPEC_WAIT_MAX_MS, || async { daemon.active_processes("alice").await.is_empty() }).await;
    assert!(completed, "process never left the active list");
}

#[tokio::test]
async fn progress_is_live_between_transitions() {
    let daemon = Daemon::spawn(Seed::new().player("bob", "home-1").server("home-1", "10.0.0.1", 100, 100, 100).server("target-1", "10.0.0.2", 100, 100, 100));

    daemon.start_process("bob", "target-1", json!({"type": "crack"}), 5, short_crack()).await;

    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    let active = daemon.active_processes("bob").await;
    assert_eq!(active.len(), 1);
    let progress_a = active[0]["progress"].as_f64().expect("progress");
    assert!(progress_a > 0.0, "progress should have advanced after 2s of a 6s process");

    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    let active = daemon.active_processes("bob").await;
    let progress_b = active[0]["progress"].as_f64().expect("progress");
    assert!(progress_b > progress_a, "progress must never regress between polls of a running process");
}

#[tokio::test]
async fn pause_then_resume_round_trips_and_preserves_progress() {
    let daemon = Daemon::spawn(Seed::new().player("carol", "home-1").server("home-1", "10.0.0.1", 100, 100, 100).server("target-1", "10.0.0.2", 100, 100, 100));

    let start = daemon.start_process("carol", "target-1", json!({"type": "crack"}), 5, short_crack()).await;
    let pid = start["data"]["pid"].as_str().expect("pid").to_string();

    tokio::time::sleep(std::time::Duration::from_millis(1500)).await;

    let pause = daemon.post(&format!("/processes/{pid}/pause"), "carol", json!({})).await;
    assert_eq!(pause.status(), 200);

    let active = daemon.active_processes("carol").await;
    assert_eq!(active[0]["state"], "Paused { reason: Manual }");
    let paused_progress = active[0]["progress"].as_f64().expect("progress");

    // Progress must hold steady while paused: poll twice with a pause in between.
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    let still_paused = daemon.active_processes("carol").await;
    assert_eq!(still_paused[0]["progress"].as_f64().expect("progress"), paused_progress);

    let resume = daemon.post(&format!("/processes/{pid}/resume"), "carol", json!({})).await;
    assert_eq!(resume.status(), 200);
    assert_eq!(resume.json::<serde_json::Value>().await.expect("resume json")["data"], true);

    let completed = wait_for_async(SPEC_WAIT_MAX_MS, || async { daemon.active_processes("carol").await.is_empty() }).await;
    assert!(completed, "process should complete after resuming");
}

#[tokio::test]
async fn cancel_releases_resources_and_removes_from_active_list() {
    let daemon = Daemon::spawn(Seed::new().player("dave", "home-1").server("home-1", "10.0.0.1", 100, 100, 100).server("target-1", "10.0.0.2", 100, 100, 100));

    let start = daemon.start_process("dave", "target-1", json!({"type": "crack"}), 5, short_crack()).await;
    let pid = start["data"]["pid"].as_str().expect("pid").to_string();

    let kill = daemon.post(&format!("/processes/{pid}/kill"), "dave", json!({})).await;
    assert_eq!(kill.status(), 200);

    let active = daemon.active_processes("dave").await;
    assert!(active.is_empty(), "cancelled process must not appear in the active list");

    // The freed RAM/CPU/NET is immediately available to a second process
    // on the same target.
    let second = daemon.start_process("dave", "target-1", json!({"type": "crack"}), 5, short_crack()).await;
    assert_eq!(second["success"], true, "resources released by cancel should be re-admittable");
}
