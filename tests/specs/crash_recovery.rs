// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crash recovery: a process still RUNNING when the daemon is hard-killed
//! must reappear non-terminal after restart against the same state
//! directory, replayed from the WAL on top of the last snapshot.

use crate::prelude::*;
use serde_json::json;

#[tokio::test]
async fn running_process_survives_a_hard_kill_and_restart() {
    let mut daemon = Daemon::spawn(
        Seed::new()
            .player("erin", "home-1")
            .server("home-1", "10.0.0.1", 100, 100, 100)
            .server("target-1", "10.0.0.2", 100, 100, 100),
    );

    let start = daemon
        .start_process(
            "erin",
            "target-1",
            json!({"type": "crack"}),
            5,
            json!({"effectiveness": 1.0, "target_difficulty": 1000.0, "size": 0}),
        )
        .await;
    assert_eq!(start["success"], true);
    let pid = start["data"]["pid"].as_str().expect("pid").to_string();

    // Let the engine durably record at least the start event before we pull
    // the plug, since only what was flushed to the WAL survives.
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    daemon.kill();
    let daemon = Daemon::respawn(daemon);

    let active = daemon.active_processes("erin").await;
    assert_eq!(active.len(), 1, "process started before the crash should still be tracked");
    assert_eq!(active[0]["pid"], pid);
    assert_ne!(active[0]["state"], "Cancelled");
    assert!(!active[0]["state"].as_str().unwrap_or_default().starts_with("CompletedFail"));
}

#[tokio::test]
async fn graceful_shutdown_checkpoints_and_restart_still_sees_the_process() {
    let mut daemon = Daemon::spawn(
        Seed::new()
            .player("frank", "home-1")
            .server("home-1", "10.0.0.1", 100, 100, 100)
            .server("target-1", "10.0.0.2", 100, 100, 100),
    );

    let start = daemon
        .start_process(
            "frank",
            "target-1",
            json!({"type": "crack"}),
            5,
            json!({"effectiveness": 1.0, "target_difficulty": 1000.0, "size": 0}),
        )
        .await;
    let pid = start["data"]["pid"].as_str().expect("pid").to_string();

    // SIGTERM rather than SIGKILL: the daemon's signal handler flushes and
    // checkpoints before exiting.
    let _ = std::process::Command::new("kill").args(["-TERM", &daemon.os_pid().to_string()]).status();
    wait_for(SPEC_WAIT_MAX_MS, || !daemon.is_alive());

    let daemon = Daemon::respawn(daemon);
    let active = daemon.active_processes("frank").await;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["pid"], pid);
}
