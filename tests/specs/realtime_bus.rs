// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The bus WebSocket: auth handshake, auto-subscription to the caller's own
//! `user:<id>` channel, coarse progress pushes, completion notification,
//! and channel-subscribe authorization (clan channels are always refused,
//! since no clan data model exists yet).

use crate::prelude::*;
use futures::SinkExt;
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn auth_failure_is_reported_and_the_socket_closes() {
    let daemon = Daemon::spawn(Seed::new().player("gina", "home-1").server("home-1", "10.0.0.1", 100, 100, 100));

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", daemon.addr)).await.expect("ws connect");
    ws.send(Message::Text(json!({"type": "auth", "token": ""}).to_string()))
        .await
        .expect("send auth");

    let response = recv_frame(&mut ws).await;
    assert_eq!(response["type"], "auth_response");
    assert_eq!(response["success"], false);
}

#[tokio::test]
async fn process_updates_and_completion_are_pushed_to_the_owning_player() {
    let daemon = Daemon::spawn(
        Seed::new().player("hank", "home-1").server("home-1", "10.0.0.1", 100, 100, 100).server("target-1", "10.0.0.2", 100, 100, 100),
    );

    let mut ws = daemon.ws_connect("hank").await;

    daemon
        .start_process(
            "hank",
            "target-1",
            json!({"type": "crack"}),
            5,
            json!({"effectiveness": 100.0, "target_difficulty": 1.0, "size": 0}),
        )
        .await;

    let update = recv_frame_matching(&mut ws, SPEC_WAIT_MAX_MS, |frame| frame["type"] == "process_update").await;
    let progress = update["progress"].as_f64().expect("progress");
    assert!((0.0..=1.0).contains(&progress));

    let complete = recv_frame_matching(&mut ws, SPEC_WAIT_MAX_MS, |frame| frame["type"] == "process_complete").await;
    assert_eq!(complete["result"], "success");
}

#[tokio::test]
async fn clan_channel_subscription_is_always_refused() {
    let daemon = Daemon::spawn(Seed::new().player("ivy", "home-1").server("home-1", "10.0.0.1", 100, 100, 100));
    let mut ws = daemon.ws_connect("ivy").await;

    ws.send(Message::Text(json!({"type": "subscribe", "channel": "clan:crew-1"}).to_string())).await.expect("send subscribe");

    let reply = recv_frame(&mut ws).await;
    assert_eq!(reply["type"], "error");
}

#[tokio::test]
async fn global_channel_subscription_succeeds() {
    let daemon = Daemon::spawn(Seed::new().player("jill", "home-1").server("home-1", "10.0.0.1", 100, 100, 100));
    let mut ws = daemon.ws_connect("jill").await;

    ws.send(Message::Text(json!({"type": "subscribe", "channel": "global"}).to_string())).await.expect("send subscribe");
    ws.send(Message::Text(json!({"type": "ping"}).to_string())).await.expect("send ping");
    let pong = recv_frame(&mut ws).await;
    assert_eq!(pong["type"], "pong", "subscribe to an allowed channel should not itself produce a reply frame");
}
