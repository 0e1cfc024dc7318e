// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn completion_timer_roundtrips_pid() {
    let timer = TimerId::completion("pid-42");
    assert!(timer.is_completion());
    assert_eq!(timer.pid_str(), Some("pid-42"));
}

#[test]
fn distinct_kinds_do_not_cross_match() {
    let completion = TimerId::completion("pid-1");
    let tick = TimerId::progress_tick("pid-1");
    let detection = TimerId::detection_roll("pid-1");
    assert!(!completion.is_progress_tick());
    assert!(!completion.is_detection_roll());
    assert!(!tick.is_completion());
    assert!(!detection.is_completion());
}

#[test]
fn connection_heartbeat_is_not_pid_scoped() {
    let timer = TimerId::connection_heartbeat("conn-9");
    assert!(timer.is_connection_heartbeat());
    assert_eq!(timer.pid_str(), None);
}
