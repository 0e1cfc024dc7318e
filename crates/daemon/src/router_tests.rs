// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use breach_adapters::{FakePublisher, FakeStore};
use breach_bus::session::fake::{FakeClanMembership, FakeSessionVerifier};
use breach_bus::ChannelRegistry;
use breach_core::{FakeClock, Player, ResourceShare, SequentialIdGen};
use breach_engine::detection::FixedRollSource;
use breach_engine::{Engine, ResourceAccountant};
use breach_storage::MaterializedState;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const TOKEN: &str = "test-token";
const PLAYER_ID: &str = "player-1";

fn test_state() -> AppState<FakeSessionVerifier, FakeClanMembership, FakeClock> {
    let mut state = MaterializedState::default();
    state.players.insert(PLAYER_ID.to_string(), Player::new(PLAYER_ID, "neo", "srv-home"));

    let mut engine = Engine::new(
        FakeStore::new(),
        Arc::new(FakePublisher::new()),
        FakeClock::new(),
        SequentialIdGen::new("pid"),
        state,
        ResourceAccountant::new(),
    );
    engine.register_server("srv-1", ResourceShare::new(10, 10, 10));

    let engine = crate::engine_actor::spawn(
        engine,
        Box::new(FixedRollSource(1.0)),
        Duration::from_secs(3600),
        Duration::from_secs(3600),
    );

    let bus = Arc::new(breach_bus::BusState {
        registry: Arc::new(ChannelRegistry::new()),
        verifier: Arc::new(FakeSessionVerifier::new().with_token(TOKEN, PLAYER_ID)),
        clan_membership: Arc::new(FakeClanMembership::new()),
        clock: FakeClock::new(),
        heartbeat: breach_bus::HeartbeatPolicy::new(30_000),
        outbound_capacity: 32,
        auth_timeout: Duration::from_secs(5),
    });

    AppState { engine, bus }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn processes_active_rejects_a_missing_bearer_token() {
    let app = router(test_state());
    let request = Request::builder().uri("/processes/active").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn processes_active_rejects_an_unknown_token() {
    let app = router(test_state());
    let request = Request::builder()
        .uri("/processes/active")
        .header("Authorization", "Bearer not-a-real-token")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn processes_active_is_empty_before_anything_is_started() {
    let app = router(test_state());
    let request = Request::builder()
        .uri("/processes/active")
        .header("Authorization", format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn processes_start_then_active_reports_the_new_process() {
    let app = router(test_state());

    let start_body = serde_json::json!({
        "action": {"type": "port_scan"},
        "target_server_id": "srv-1",
        "stealth_level": 50,
    });
    let request = Request::builder()
        .method("POST")
        .uri("/processes/start")
        .header("Authorization", format!("Bearer {TOKEN}"))
        .header("Content-Type", "application/json")
        .body(Body::from(start_body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body["data"]["pid"].as_str().is_some());

    let request = Request::builder()
        .uri("/processes/active")
        .header("Authorization", format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn processes_kill_on_an_unknown_pid_returns_not_found() {
    let app = router(test_state());
    let request = Request::builder()
        .method("POST")
        .uri("/processes/no-such-pid/kill")
        .header("Authorization", format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_profile_returns_the_authenticated_players_data() {
    let app = router(test_state());
    let request = Request::builder()
        .uri("/user/profile")
        .header("Authorization", format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["player_id"], PLAYER_ID);
    assert_eq!(body["data"]["login"], "neo");
}

#[tokio::test]
async fn start_on_an_unregistered_server_fails_admission() {
    let app = router(test_state());
    let start_body = serde_json::json!({
        "action": {"type": "port_scan"},
        "target_server_id": "no-such-server",
    });
    let request = Request::builder()
        .method("POST")
        .uri("/processes/start")
        .header("Authorization", format!("Bearer {TOKEN}"))
        .header("Content-Type", "application/json")
        .body(Body::from(start_body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}
