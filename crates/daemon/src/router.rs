// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP surface: process lifecycle, read-only snapshots, and the bus
//! upgrade endpoint, composed under one axum `Router` via `FromRef`
//! sub-state extraction.

use crate::engine_actor::{EngineCallError, EngineHandle};
use axum::extract::{FromRef, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use breach_bus::{BusState, ClanMembership, SessionVerifier};
use breach_core::process::{Action, PauseReason};
use breach_core::Clock;
use breach_engine::{ActionInputs, RuntimeError, StartCommand, StartOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub struct AppState<V, M, C> {
    pub engine: EngineHandle,
    pub bus: Arc<BusState<V, M, C>>,
}

impl<V, M, C> Clone for AppState<V, M, C> {
    fn clone(&self) -> Self {
        Self { engine: self.engine.clone(), bus: Arc::clone(&self.bus) }
    }
}

impl<V, M, C> FromRef<AppState<V, M, C>> for EngineHandle {
    fn from_ref(state: &AppState<V, M, C>) -> Self {
        state.engine.clone()
    }
}

impl<V, M, C> FromRef<AppState<V, M, C>> for Arc<BusState<V, M, C>> {
    fn from_ref(state: &AppState<V, M, C>) -> Self {
        Arc::clone(&state.bus)
    }
}

pub fn router<V, M, C>(state: AppState<V, M, C>) -> Router
where
    V: SessionVerifier,
    M: ClanMembership,
    C: Clock,
{
    Router::new()
        .route("/ws", get(breach_bus::upgrade::<V, M, C>))
        .route("/processes/active", get(processes_active::<V, M, C>))
        .route("/processes/start", post(processes_start::<V, M, C>))
        .route("/processes/:pid/kill", post(processes_kill::<V, M, C>))
        .route("/processes/:pid/pause", post(processes_pause::<V, M, C>))
        .route("/processes/:pid/resume", post(processes_resume::<V, M, C>))
        .route("/user/profile", get(user_profile::<V, M, C>))
        .route("/user/stats", get(user_stats::<V, M, C>))
        .route("/software/installed", get(software_installed::<V, M, C>))
        .route("/hardware/owned", get(hardware_owned::<V, M, C>))
        .route("/servers/available", get(servers_available::<V, M, C>))
        .route("/sync", get(sync::<V, M, C>))
        .with_state(state)
}

#[derive(Serialize)]
struct Envelope<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self { success: true, data: Some(data), error: None })
    }
}

fn failure(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, Json(Envelope::<()> { success: false, data: None, error: Some(message.into()) })).into_response()
}

/// Resolve the caller's player id from `Authorization: Bearer <token>`.
async fn authenticate<V, M, C>(headers: &HeaderMap, bus: &BusState<V, M, C>) -> Result<String, axum::response::Response>
where
    V: SessionVerifier,
{
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "missing bearer token"))?;
    bus.verifier.verify(token).await.map_err(|_| failure(StatusCode::UNAUTHORIZED, "invalid token"))
}

fn engine_error_response(err: EngineCallError) -> axum::response::Response {
    match err {
        EngineCallError::Runtime(RuntimeError::ProcessNotFound(pid)) => {
            failure(StatusCode::NOT_FOUND, format!("process not found: {pid}"))
        }
        EngineCallError::Runtime(RuntimeError::ServerNotFound(id)) => {
            failure(StatusCode::NOT_FOUND, format!("server not found: {id}"))
        }
        EngineCallError::Runtime(RuntimeError::InvalidTransition { pid, reason }) => {
            failure(StatusCode::CONFLICT, format!("process {pid}: {reason}"))
        }
        EngineCallError::Runtime(RuntimeError::DurableStoreUnavailable(_)) | EngineCallError::ActorGone => {
            failure(StatusCode::SERVICE_UNAVAILABLE, "engine unavailable")
        }
    }
}

#[derive(Serialize)]
struct ActiveProcess {
    pid: String,
    action: Action,
    target_ip: String,
    state: String,
    progress: f64,
    seconds_remaining: f64,
    cpu_share: u64,
    net_share: u64,
    ram_share: u64,
    priority: u8,
}

async fn processes_active<V, M, C>(
    State(engine): State<EngineHandle>,
    State(bus): State<Arc<BusState<V, M, C>>>,
    headers: HeaderMap,
) -> axum::response::Response
where
    V: SessionVerifier,
    M: ClanMembership,
    C: Clock,
{
    let player_id = match authenticate(&headers, &bus).await {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let snapshot = match engine.snapshot().await {
        Ok(s) => s,
        Err(err) => return engine_error_response(err),
    };

    let processes: Vec<ActiveProcess> = snapshot
        .processes_by_creator(&player_id)
        .into_iter()
        .filter(|p| !p.state.is_terminal())
        .map(|p| ActiveProcess {
            pid: p.pid.clone(),
            action: p.action.clone(),
            target_ip: snapshot.servers.get(&p.target_server_id).map(|s| s.ip.clone()).unwrap_or_default(),
            state: format!("{:?}", p.state),
            progress: p.progress(),
            seconds_remaining: p.remaining_seconds(),
            cpu_share: p.resource_request.cpu,
            net_share: p.resource_request.net,
            ram_share: p.resource_request.ram,
            priority: p.priority,
        })
        .collect();

    Envelope::ok(processes).into_response()
}

#[derive(Deserialize)]
struct StartProcessRequest {
    action: Action,
    target_server_id: String,
    #[serde(default)]
    software_id: Option<String>,
    #[serde(default)]
    inputs: ActionInputs,
    #[serde(default = "default_priority")]
    priority: u8,
    #[serde(default)]
    stealth_level: u8,
}

fn default_priority() -> u8 {
    5
}

#[derive(Serialize)]
struct StartProcessResponse {
    pid: String,
}

async fn processes_start<V, M, C>(
    State(engine): State<EngineHandle>,
    State(bus): State<Arc<BusState<V, M, C>>>,
    headers: HeaderMap,
    Json(body): Json<StartProcessRequest>,
) -> axum::response::Response
where
    V: SessionVerifier,
    M: ClanMembership,
    C: Clock,
{
    let player_id = match authenticate(&headers, &bus).await {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let cmd = StartCommand {
        creator_id: player_id,
        target_server_id: body.target_server_id,
        action: body.action,
        software_id: body.software_id,
        inputs: body.inputs,
        priority: body.priority,
        stealth_level: body.stealth_level,
    };

    match engine.start(cmd).await {
        Ok(StartOutcome::Admitted { pid }) => Envelope::ok(StartProcessResponse { pid }).into_response(),
        Ok(StartOutcome::Failed { pid: _, reason }) => failure(StatusCode::CONFLICT, format!("{reason:?}")),
        Err(err) => engine_error_response(err),
    }
}

async fn processes_kill<V, M, C>(
    State(engine): State<EngineHandle>,
    State(bus): State<Arc<BusState<V, M, C>>>,
    headers: HeaderMap,
    Path(pid): Path<String>,
) -> axum::response::Response
where
    V: SessionVerifier,
    M: ClanMembership,
    C: Clock,
{
    if let Err(resp) = authenticate(&headers, &bus).await {
        return resp;
    }
    match engine.cancel(pid).await {
        Ok(()) => Envelope::ok(()).into_response(),
        Err(err) => engine_error_response(err),
    }
}

async fn processes_pause<V, M, C>(
    State(engine): State<EngineHandle>,
    State(bus): State<Arc<BusState<V, M, C>>>,
    headers: HeaderMap,
    Path(pid): Path<String>,
) -> axum::response::Response
where
    V: SessionVerifier,
    M: ClanMembership,
    C: Clock,
{
    if let Err(resp) = authenticate(&headers, &bus).await {
        return resp;
    }
    match engine.pause(pid, PauseReason::Manual).await {
        Ok(()) => Envelope::ok(()).into_response(),
        Err(err) => engine_error_response(err),
    }
}

async fn processes_resume<V, M, C>(
    State(engine): State<EngineHandle>,
    State(bus): State<Arc<BusState<V, M, C>>>,
    headers: HeaderMap,
    Path(pid): Path<String>,
) -> axum::response::Response
where
    V: SessionVerifier,
    M: ClanMembership,
    C: Clock,
{
    if let Err(resp) = authenticate(&headers, &bus).await {
        return resp;
    }
    match engine.resume(pid).await {
        Ok(resumed) => Envelope::ok(resumed).into_response(),
        Err(err) => engine_error_response(err),
    }
}

#[derive(Serialize)]
struct UserProfile {
    player_id: String,
    login: String,
    level: u32,
    experience: u64,
    premium: bool,
    home_server_id: String,
}

async fn user_profile<V, M, C>(
    State(engine): State<EngineHandle>,
    State(bus): State<Arc<BusState<V, M, C>>>,
    headers: HeaderMap,
) -> axum::response::Response
where
    V: SessionVerifier,
    M: ClanMembership,
    C: Clock,
{
    let player_id = match authenticate(&headers, &bus).await {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let snapshot = match engine.snapshot().await {
        Ok(s) => s,
        Err(err) => return engine_error_response(err),
    };
    let Some(player) = snapshot.players.get(&player_id) else {
        return failure(StatusCode::NOT_FOUND, "unknown player");
    };
    Envelope::ok(UserProfile {
        player_id: player.player_id.clone(),
        login: player.login.clone(),
        level: player.level,
        experience: player.experience,
        premium: player.premium,
        home_server_id: player.home_server_id.clone(),
    })
    .into_response()
}

#[derive(Serialize)]
struct UserStats {
    wallet_balance_minor: i64,
    reputation: std::collections::HashMap<String, i32>,
    active_process_count: usize,
}

async fn user_stats<V, M, C>(
    State(engine): State<EngineHandle>,
    State(bus): State<Arc<BusState<V, M, C>>>,
    headers: HeaderMap,
) -> axum::response::Response
where
    V: SessionVerifier,
    M: ClanMembership,
    C: Clock,
{
    let player_id = match authenticate(&headers, &bus).await {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let snapshot = match engine.snapshot().await {
        Ok(s) => s,
        Err(err) => return engine_error_response(err),
    };
    let Some(player) = snapshot.players.get(&player_id) else {
        return failure(StatusCode::NOT_FOUND, "unknown player");
    };
    let active_process_count =
        snapshot.processes_by_creator(&player_id).into_iter().filter(|p| !p.state.is_terminal()).count();
    Envelope::ok(UserStats {
        wallet_balance_minor: player.wallet_balance.0,
        reputation: player.reputation.clone(),
        active_process_count,
    })
    .into_response()
}

async fn software_installed<V, M, C>(
    State(engine): State<EngineHandle>,
    State(bus): State<Arc<BusState<V, M, C>>>,
    headers: HeaderMap,
) -> axum::response::Response
where
    V: SessionVerifier,
    M: ClanMembership,
    C: Clock,
{
    let player_id = match authenticate(&headers, &bus).await {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let snapshot = match engine.snapshot().await {
        Ok(s) => s,
        Err(err) => return engine_error_response(err),
    };
    let owned: Vec<_> = snapshot.software.values().filter(|s| s.owner_id == player_id).cloned().collect();
    Envelope::ok(owned).into_response()
}

async fn hardware_owned<V, M, C>(
    State(engine): State<EngineHandle>,
    State(bus): State<Arc<BusState<V, M, C>>>,
    headers: HeaderMap,
) -> axum::response::Response
where
    V: SessionVerifier,
    M: ClanMembership,
    C: Clock,
{
    let player_id = match authenticate(&headers, &bus).await {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let snapshot = match engine.snapshot().await {
        Ok(s) => s,
        Err(err) => return engine_error_response(err),
    };
    let owned: Vec<_> = snapshot.servers.values().filter(|s| s.owner_id.as_deref() == Some(player_id.as_str())).cloned().collect();
    Envelope::ok(owned).into_response()
}

async fn servers_available<V, M, C>(
    State(engine): State<EngineHandle>,
    State(bus): State<Arc<BusState<V, M, C>>>,
    headers: HeaderMap,
) -> axum::response::Response
where
    V: SessionVerifier,
    M: ClanMembership,
    C: Clock,
{
    if let Err(resp) = authenticate(&headers, &bus).await {
        return resp;
    }
    let snapshot = match engine.snapshot().await {
        Ok(s) => s,
        Err(err) => return engine_error_response(err),
    };
    let available: Vec<_> = snapshot.servers.values().filter(|s| s.online).cloned().collect();
    Envelope::ok(available).into_response()
}

#[derive(Serialize)]
struct SyncSnapshot {
    processes: Vec<ActiveProcess>,
    stats: UserStats,
}

async fn sync<V, M, C>(
    State(engine): State<EngineHandle>,
    State(bus): State<Arc<BusState<V, M, C>>>,
    headers: HeaderMap,
) -> axum::response::Response
where
    V: SessionVerifier,
    M: ClanMembership,
    C: Clock,
{
    let player_id = match authenticate(&headers, &bus).await {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let snapshot = match engine.snapshot().await {
        Ok(s) => s,
        Err(err) => return engine_error_response(err),
    };
    let Some(player) = snapshot.players.get(&player_id) else {
        return failure(StatusCode::NOT_FOUND, "unknown player");
    };

    let processes: Vec<ActiveProcess> = snapshot
        .processes_by_creator(&player_id)
        .into_iter()
        .filter(|p| !p.state.is_terminal())
        .map(|p| ActiveProcess {
            pid: p.pid.clone(),
            action: p.action.clone(),
            target_ip: snapshot.servers.get(&p.target_server_id).map(|s| s.ip.clone()).unwrap_or_default(),
            state: format!("{:?}", p.state),
            progress: p.progress(),
            seconds_remaining: p.remaining_seconds(),
            cpu_share: p.resource_request.cpu,
            net_share: p.resource_request.net,
            ram_share: p.resource_request.ram,
            priority: p.priority,
        })
        .collect();

    let active_process_count = processes.len();
    Envelope::ok(SyncSnapshot {
        processes,
        stats: UserStats {
            wallet_balance_minor: player.wallet_balance.0,
            reputation: player.reputation.clone(),
            active_process_count,
        },
    })
    .into_response()
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
