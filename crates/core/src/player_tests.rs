// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn level_curve_is_monotonic_non_decreasing() {
    let mut last = 0;
    for experience in (0..600_000).step_by(5_000) {
        let level = level_for_experience(experience);
        assert!(level >= last);
        last = level;
    }
}

#[test]
fn grant_experience_recomputes_level() {
    let mut player = Player::new("p1", "zero_cool", "srv-home");
    assert_eq!(player.level, 0);
    player.grant_experience(3_500);
    assert_eq!(player.level, level_for_experience(3_500));
    assert!(player.level > 0);
}

#[test]
fn reputation_clamps_to_documented_range() {
    let mut player = Player::new("p1", "acid_burn", "srv-home");
    player.adjust_reputation("hacking", -5_000);
    assert_eq!(player.reputation_in("hacking"), REPUTATION_MIN);
    player.adjust_reputation("hacking", 10_000);
    assert_eq!(player.reputation_in("hacking"), REPUTATION_MAX);
}

#[test]
fn unknown_reputation_category_defaults_to_zero() {
    let player = Player::new("p1", "crash_override", "srv-home");
    assert_eq!(player.reputation_in("trading"), 0);
}
