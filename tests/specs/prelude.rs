// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared black-box harness: spawns the real `breachd` binary against a
//! seeded durable snapshot and drives it over HTTP and the bus WebSocket.
//! Mirrors the CLI-spec harness pattern (binary resolution, polling,
//! a `Drop`-cleaned-up fixture) but for a long-running network daemon
//! instead of a one-shot CLI invocation.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use breach_core::{Player, ResourceShare, Server};
use breach_storage::{MaterializedState, Snapshot};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub const SPEC_POLL_INTERVAL_MS: u64 = 20;
pub const SPEC_WAIT_MAX_MS: u64 = 3_000;

pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

fn breachd_binary() -> PathBuf {
    assert_cmd::cargo::cargo_bin("breachd")
}

/// Reserve an ephemeral port by binding and releasing it immediately. The
/// daemon binds its own listener a moment later; good enough for a
/// single-threaded test run with no other listener racing for the same port.
fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}

pub fn wait_for<F: FnMut() -> bool>(timeout_ms: u64, mut condition: F) -> bool {
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(SPEC_POLL_INTERVAL_MS));
    }
    false
}

/// Async counterpart of `wait_for`, for conditions that themselves poll the
/// daemon over HTTP.
pub async fn wait_for_async<F, Fut>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    while Instant::now() < deadline {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(SPEC_POLL_INTERVAL_MS)).await;
    }
    false
}

/// Builds up a seed `MaterializedState` before any daemon is spawned
/// against it, since the event log has no "create player"/"create server"
/// events of its own.
#[derive(Default)]
pub struct Seed {
    state: MaterializedState,
}

impl Seed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(mut self, player_id: &str, home_server_id: &str) -> Self {
        self.state.players.insert(player_id.to_string(), Player::new(player_id, format!("{player_id}-login"), home_server_id));
        self
    }

    pub fn server(mut self, server_id: &str, ip: &str, cpu: u64, ram: u64, net: u64) -> Self {
        self.state.servers.insert(server_id.to_string(), Server::new(server_id, ip, ResourceShare::new(cpu, ram, net)));
        self
    }

    pub fn bank_account(mut self, account_id: &str, owner_id: &str, bank_id: &str) -> Self {
        self.state.bank_accounts.insert(account_id.to_string(), breach_core::BankAccount::new(account_id, owner_id, bank_id));
        self
    }

    pub fn into_state(self) -> MaterializedState {
        self.state
    }
}

pub struct Daemon {
    child: Child,
    pub addr: String,
    // `Option` so `respawn` can reclaim these via `take()` without a partial
    // move out of a type that implements `Drop`.
    state_dir: Option<tempfile::TempDir>,
    log_dir: Option<tempfile::TempDir>,
}

impl Daemon {
    /// Spawn against a freshly seeded snapshot at sequence 0.
    pub fn spawn(seed: Seed) -> Self {
        let state_dir = tempfile::tempdir().expect("state tempdir");
        let log_dir = tempfile::tempdir().expect("log tempdir");
        Snapshot::new(0, seed.into_state())
            .save(&state_dir.path().join("breach.snapshot"))
            .expect("save seed snapshot");
        Self::spawn_in(state_dir, log_dir)
    }

    /// Respawn against the state and log directories an earlier `Daemon`
    /// used, simulating recovery from a crash or restart. Kills the prior
    /// process first if it's still alive.
    pub fn respawn(mut prior: Daemon) -> Self {
        let _ = prior.child.kill();
        let _ = prior.child.wait();
        let state_dir = prior.state_dir.take().expect("state dir already reclaimed");
        let log_dir = prior.log_dir.take().expect("log dir already reclaimed");
        Self::spawn_in(state_dir, log_dir)
    }

    fn spawn_in(state_dir: tempfile::TempDir, log_dir: tempfile::TempDir) -> Self {
        let addr = format!("127.0.0.1:{}", free_port());
        let child = Command::new(breachd_binary())
            .env("BREACH_STATE_DIR", state_dir.path())
            .env("BREACH_LOG_DIR", log_dir.path())
            .env("BREACH_HTTP_BIND_ADDR", &addr)
            .env("BREACH_HEARTBEAT_MS", "500")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn breachd");

        let daemon = Self { child, addr, state_dir: Some(state_dir), log_dir: Some(log_dir) };
        if !wait_for(SPEC_WAIT_MAX_MS, || std::net::TcpStream::connect(&daemon.addr).is_ok()) {
            panic!("breachd never started listening on {}", daemon.addr);
        }
        daemon
    }

    /// SIGKILL the daemon, simulating a hard crash rather than a clean exit.
    pub fn kill(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }

    pub fn os_pid(&self) -> u32 {
        self.child.id()
    }

    /// Whether the process is still running, reaping it if it has exited.
    pub fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn get(&self, path: &str, player_id: &str) -> reqwest::Response {
        reqwest::Client::new().get(self.url(path)).bearer_auth(player_id).send().await.expect("http get")
    }

    pub async fn post(&self, path: &str, player_id: &str, body: Value) -> reqwest::Response {
        reqwest::Client::new().post(self.url(path)).bearer_auth(player_id).json(&body).send().await.expect("http post")
    }

    pub async fn start_process(&self, player_id: &str, target_server_id: &str, action: Value, priority: u8, inputs: Value) -> Value {
        let response = self
            .post(
                "/processes/start",
                player_id,
                json!({
                    "action": action,
                    "target_server_id": target_server_id,
                    "priority": priority,
                    "inputs": inputs,
                }),
            )
            .await;
        response.json::<Value>().await.expect("start response json")
    }

    pub async fn active_processes(&self, player_id: &str) -> Vec<Value> {
        let body: Value = self.get("/processes/active", player_id).await.json().await.expect("active response json");
        body["data"].as_array().expect("data array").clone()
    }

    /// Open an authenticated WS connection, consuming the `auth_response`
    /// and `connected` frames every connection sends unconditionally.
    pub async fn ws_connect(&self, player_id: &str) -> WsStream {
        let (mut ws, _) = connect_async(format!("ws://{}/ws", self.addr)).await.expect("ws connect");
        ws.send(Message::Text(json!({"type": "auth", "token": player_id}).to_string())).await.expect("send auth");

        let auth_response = recv_frame(&mut ws).await;
        assert_eq!(auth_response["type"], "auth_response");
        assert_eq!(auth_response["success"], true);

        let connected = recv_frame(&mut ws).await;
        assert_eq!(connected["type"], "connected");

        ws
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Read the next text frame and parse it as JSON, skipping WS-protocol
/// ping/pong control frames rather than treating them as spec frames.
pub async fn recv_frame(ws: &mut WsStream) -> Value {
    loop {
        match ws.next().await.expect("ws closed unexpectedly").expect("ws transport error") {
            Message::Text(text) => return serde_json::from_str(&text).expect("frame should be json"),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected ws message: {other:?}"),
        }
    }
}

/// Poll `recv_frame` until one matches `predicate` or `timeout_ms` elapses,
/// for frames (like `process_update`) a fast-completing process may emit
/// zero or more of before the frame under test arrives.
pub async fn recv_frame_matching(ws: &mut WsStream, timeout_ms: u64, predicate: impl Fn(&Value) -> bool) -> Value {
    tokio::time::timeout(Duration::from_millis(timeout_ms), async {
        loop {
            let frame = recv_frame(ws).await;
            if predicate(&frame) {
                return frame;
            }
        }
    })
    .await
    .expect("timed out waiting for matching frame")
}
