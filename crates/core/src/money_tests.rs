// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn add_and_sub_are_exact() {
    let a = Money(500);
    let b = Money(150);
    assert_eq!(a + b, Money(650));
    assert_eq!(a - b, Money(350));
}

#[test]
fn checked_sub_detects_overflow() {
    assert_eq!(Money(i64::MIN).checked_sub(Money(1)), None);
    assert_eq!(Money(10).checked_sub(Money(3)), Some(Money(7)));
}

#[test]
fn sum_over_iterator() {
    let total: Money = vec![Money(100), Money(200), Money(-50)].into_iter().sum();
    assert_eq!(total, Money(250));
}

#[test]
fn is_negative_reflects_sign() {
    assert!(Money(-1).is_negative());
    assert!(!Money(0).is_negative());
}
