// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use breach_core::{Clock, FakeClock};

#[test]
fn timer_fires_after_its_deadline_and_not_before() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();

    scheduler.schedule(TimerId::completion("pid-1"), Duration::from_secs(10), clock.now());
    assert!(scheduler.has_timers());

    clock.advance(Duration::from_secs(5));
    assert!(scheduler.fired(clock.now()).is_empty());

    clock.advance(Duration::from_secs(10));
    let fired = scheduler.fired(clock.now());
    assert_eq!(fired, vec![TimerId::completion("pid-1")]);
    assert!(!scheduler.has_timers());
}

#[test]
fn cancel_is_idempotent() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    let id = TimerId::completion("pid-1");
    scheduler.schedule(id.clone(), Duration::from_secs(10), clock.now());

    scheduler.cancel(&id);
    scheduler.cancel(&id);

    clock.advance(Duration::from_secs(20));
    assert!(scheduler.fired(clock.now()).is_empty());
}

#[test]
fn rescheduling_the_same_id_replaces_the_deadline() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    let id = TimerId::completion("pid-1");

    scheduler.schedule(id.clone(), Duration::from_secs(10), clock.now());
    clock.advance(Duration::from_secs(2));
    scheduler.schedule(id.clone(), Duration::from_secs(20), clock.now());

    clock.advance(Duration::from_secs(9));
    assert!(scheduler.fired(clock.now()).is_empty(), "original 10s deadline must be gone");

    clock.advance(Duration::from_secs(12));
    assert_eq!(scheduler.fired(clock.now()), vec![id]);
}

#[test]
fn cancel_all_for_pid_removes_completion_progress_and_detection_timers() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();

    scheduler.schedule(TimerId::completion("pid-1"), Duration::from_secs(10), clock.now());
    scheduler.schedule(TimerId::progress_tick("pid-1"), Duration::from_secs(5), clock.now());
    scheduler.schedule(TimerId::detection_roll("pid-1"), Duration::from_secs(5), clock.now());
    scheduler.schedule(TimerId::completion("pid-2"), Duration::from_secs(10), clock.now());

    scheduler.cancel_all_for_pid("pid-1");

    clock.advance(Duration::from_secs(20));
    let fired = scheduler.fired(clock.now());
    assert_eq!(fired, vec![TimerId::completion("pid-2")]);
}

#[test]
fn next_deadline_returns_the_earliest_pending_timer() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();

    scheduler.schedule(TimerId::completion("later"), Duration::from_secs(30), clock.now());
    scheduler.schedule(TimerId::completion("sooner"), Duration::from_secs(10), clock.now());

    assert_eq!(scheduler.next_deadline(), Some(clock.now() + Duration::from_secs(10)));
}

#[test]
fn empty_scheduler_has_no_deadline() {
    let scheduler = Scheduler::new();
    assert!(!scheduler.has_timers());
    assert!(scheduler.next_deadline().is_none());
}
