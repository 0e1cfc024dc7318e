// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bank accounts and the double-entry transaction log backing transfers.

use crate::money::Money;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a bank account.
    #[derive(Default)]
    pub struct AccountId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccount {
    pub account_id: String,
    pub owner_id: String,
    pub bank_id: String,
    pub balance: Money,
    pub status: AccountStatus,
    /// Whether a negative balance is permitted on this account.
    pub overdraft_authorised: bool,
}

impl BankAccount {
    pub fn new(account_id: impl Into<String>, owner_id: impl Into<String>, bank_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            owner_id: owner_id.into(),
            bank_id: bank_id.into(),
            balance: Money::ZERO,
            status: AccountStatus::Open,
            overdraft_authorised: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == AccountStatus::Open
    }

    /// Whether debiting `amount` would leave the account within its
    /// overdraft policy.
    pub fn can_debit(&self, amount: Money) -> bool {
        self.overdraft_authorised || self.balance >= amount
    }
}

/// One leg of a double-entry transfer. Every transfer produces exactly two
/// linked entries whose amounts sum to zero after fees are subtracted from
/// the debit leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub entry_id: String,
    pub transfer_id: String,
    pub account_id: String,
    /// Signed delta applied to the account: negative for the debited leg,
    /// positive for the credited leg.
    pub amount: Money,
    pub fee: Money,
    pub epoch_ms: u64,
}

/// Build the two linked legs for a transfer of `amount` from `from` to `to`,
/// charging `fee` to the debited account.
pub fn double_entry(
    transfer_id: &str,
    from_account: &str,
    to_account: &str,
    amount: Money,
    fee: Money,
    debit_entry_id: impl Into<String>,
    credit_entry_id: impl Into<String>,
    epoch_ms: u64,
) -> (LedgerEntry, LedgerEntry) {
    let debit = LedgerEntry {
        entry_id: debit_entry_id.into(),
        transfer_id: transfer_id.to_string(),
        account_id: from_account.to_string(),
        amount: Money::ZERO - amount - fee,
        fee,
        epoch_ms,
    };
    let credit = LedgerEntry {
        entry_id: credit_entry_id.into(),
        transfer_id: transfer_id.to_string(),
        account_id: to_account.to_string(),
        amount,
        fee: Money::ZERO,
        epoch_ms,
    };
    (debit, credit)
}

/// Sum of both legs' amounts net of fee, which must equal zero.
pub fn legs_balance(debit: &LedgerEntry, credit: &LedgerEntry) -> bool {
    (debit.amount + debit.fee + credit.amount) == Money::ZERO
}

#[cfg(test)]
#[path = "bank_tests.rs"]
mod tests;
