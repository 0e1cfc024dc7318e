// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_does_not_advance_on_its_own() {
    let clock = FakeClock::new();
    let t0 = clock.now();
    let t1 = clock.now();
    assert_eq!(t0, t1);
}

#[test]
fn fake_clock_advance_moves_now_and_epoch_ms() {
    let clock = FakeClock::new();
    let t0 = clock.now();
    let e0 = clock.epoch_ms();
    clock.advance(Duration::from_secs(600));
    assert_eq!(clock.now() - t0, Duration::from_secs(600));
    assert_eq!(clock.epoch_ms() - e0, 600_000);
}

#[test]
fn cloned_fake_clock_shares_the_same_offset() {
    let clock = FakeClock::new();
    let cloned = clock.clone();
    clock.advance(Duration::from_secs(5));
    assert_eq!(clock.now(), cloned.now());
}
