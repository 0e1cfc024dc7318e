// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn double_entry_legs_sum_to_zero_after_fee() {
    let (debit, credit) = double_entry(
        "tx-1",
        "acc-a",
        "acc-b",
        Money(1000),
        Money(10),
        "entry-1",
        "entry-2",
        1,
    );
    assert_eq!(debit.amount, Money(-1010));
    assert_eq!(credit.amount, Money(1000));
    assert!(legs_balance(&debit, &credit));
}

#[test]
fn can_debit_respects_overdraft_policy() {
    let mut account = BankAccount::new("acc-1", "p1", "bank-1");
    account.balance = Money(500);
    assert!(account.can_debit(Money(500)));
    assert!(!account.can_debit(Money(501)));
    account.overdraft_authorised = true;
    assert!(account.can_debit(Money(10_000)));
}

#[test]
fn closed_account_is_not_open() {
    let mut account = BankAccount::new("acc-1", "p1", "bank-1");
    assert!(account.is_open());
    account.status = AccountStatus::Closed;
    assert!(!account.is_open());
}
