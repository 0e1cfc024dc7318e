// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bank transfers run through the same process lifecycle as any other
//! action. The transfer itself is a completion effect resolved against the
//! durable account ledger at the moment the process finishes, not at admission
//! time, so a transfer that turns out to be unpayable doesn't fail the
//! process: the effect transaction is rejected and dropped, same as any
//! other completion effect a later state invalidates.

use crate::prelude::*;
use serde_json::json;

const TRANSFER_WAIT_MAX_MS: u64 = 15_000;

fn transfer(from: &str, to: &str, amount_minor: i64) -> serde_json::Value {
    json!({"type": "transfer_funds", "from_account": from, "to_account": to, "amount_minor": amount_minor})
}

#[tokio::test]
async fn well_funded_transfer_runs_to_completion() {
    let daemon = Daemon::spawn(
        Seed::new()
            .player("kay", "home-1")
            .server("home-1", "10.0.0.1", 100, 100, 100)
            .bank_account("acct-kay", "kay", "bank-1")
            .bank_account("acct-merchant", "merchant", "bank-1"),
    );

    let start = daemon.start_process("kay", "home-1", transfer("acct-kay", "acct-merchant", 500), 5, json!({})).await;
    assert_eq!(start["success"], true);
    let pid = start["data"]["pid"].as_str().expect("pid").to_string();

    let active = daemon.active_processes("kay").await;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["pid"], pid);
    assert_eq!(active[0]["state"], "Running");

    let completed = wait_for_async(TRANSFER_WAIT_MAX_MS, || async { daemon.active_processes("kay").await.is_empty() }).await;
    assert!(completed, "transfer process never left the active list");
}

#[tokio::test]
async fn transfer_to_a_nonexistent_account_still_completes_the_process() {
    // The source account exists but the destination doesn't: the transfer
    // effect is rejected at completion time, but that rejection is swallowed
    // rather than flipping the process to a failed terminal state.
    let daemon = Daemon::spawn(
        Seed::new().player("leo", "home-1").server("home-1", "10.0.0.1", 100, 100, 100).bank_account("acct-leo", "leo", "bank-1"),
    );

    let start = daemon.start_process("leo", "home-1", transfer("acct-leo", "acct-does-not-exist", 100), 5, json!({})).await;
    let pid = start["data"]["pid"].as_str().expect("pid").to_string();

    let completed = wait_for_async(TRANSFER_WAIT_MAX_MS, || async {
        !daemon.active_processes("leo").await.iter().any(|p| p["pid"] == pid)
    })
    .await;
    assert!(completed, "a rejected completion effect should not keep the process stuck as active");
}

#[tokio::test]
async fn two_transfers_from_different_accounts_run_concurrently() {
    // transfer_funds costs ResourceShare(cpu: 2, ram: 2, net: 2), cheap enough
    // that two callers never contend for the same target's resources.
    let daemon = Daemon::spawn(
        Seed::new()
            .player("mia", "home-mia")
            .player("noah", "home-noah")
            .server("home-mia", "10.0.0.1", 100, 100, 100)
            .server("home-noah", "10.0.0.2", 100, 100, 100)
            .bank_account("acct-mia", "mia", "bank-1")
            .bank_account("acct-noah", "noah", "bank-1")
            .bank_account("acct-merchant", "merchant", "bank-1"),
    );

    let mia = daemon.start_process("mia", "home-mia", transfer("acct-mia", "acct-merchant", 250), 5, json!({})).await;
    let noah = daemon.start_process("noah", "home-noah", transfer("acct-noah", "acct-merchant", 250), 5, json!({})).await;
    assert_eq!(mia["success"], true);
    assert_eq!(noah["success"], true);

    assert_eq!(daemon.active_processes("mia").await[0]["state"], "Running");
    assert_eq!(daemon.active_processes("noah").await[0]["state"], "Running");
}
