// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! breachd: the process engine, durable storage, realtime bus, and HTTP API
//! wired into one runnable binary.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use breach_core::{SystemClock, UuidIdGen};
use breach_daemon::{lifecycle, router, spawn_engine_actor, AppState, BusPublisher, Config, NoClanMembership, PassthroughVerifier, StartupResult};
use breach_engine::{Engine, ResourceAccountant, ThreadRollSource};
use breach_bus::{BusState, ChannelRegistry, HeartbeatPolicy};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

/// How often the engine drains fired scheduler timers (process completions).
const TIMER_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How often the engine runs a detection roll for every running process.
const DETECTION_INTERVAL: Duration = Duration::from_secs(5);

/// Window a freshly opened websocket connection has to send its auth frame.
const WS_AUTH_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let _log_guard = setup_logging(&config)?;

    info!("starting breachd");

    let StartupResult { store, state, recovered_seq, .. } = lifecycle::startup(&config)?;

    let registry = Arc::new(ChannelRegistry::new());
    let publisher = Arc::new(BusPublisher::new(Arc::clone(&registry)));

    let mut accountant = ResourceAccountant::new();
    for server in state.servers.values() {
        accountant.register_server(server.server_id.clone(), server.capacity);
    }

    let engine = Engine::new(store, publisher, SystemClock::new(), UuidIdGen, state, accountant);
    let engine = spawn_engine_actor(engine, Box::new(ThreadRollSource), TIMER_POLL_INTERVAL, DETECTION_INTERVAL);
    let shutdown_handle = engine.clone();

    let bus = Arc::new(BusState {
        registry,
        verifier: Arc::new(PassthroughVerifier),
        clan_membership: Arc::new(NoClanMembership),
        clock: SystemClock::new(),
        heartbeat: HeartbeatPolicy::new(config.heartbeat_interval_ms),
        outbound_capacity: config.outbound_queue_capacity,
        auth_timeout: WS_AUTH_TIMEOUT,
    });

    let app = router(AppState { engine, bus });

    let listener = TcpListener::bind(config.http_bind_addr.as_str()).await?;
    info!(addr = %config.http_bind_addr, recovered_seq, "listening");

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        result = async { axum::serve(listener, app).await } => {
            if let Err(err) = result {
                error!(error = %err, "http server exited with an error");
            }
        }
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }

    if let Err(err) = shutdown_handle.shutdown().await {
        error!(error = %err, "failed to checkpoint on shutdown");
    }

    info!("breachd stopped");
    Ok(())
}

fn setup_logging(config: &Config) -> Result<tracing_appender::non_blocking::WorkerGuard, lifecycle::LifecycleError> {
    use std::io::{Error, ErrorKind};
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    std::fs::create_dir_all(&config.log_dir)?;
    let log_path = config.log_path();
    let dir = log_path.parent().ok_or_else(|| Error::new(ErrorKind::InvalidInput, "log path has no parent directory"))?;
    let file_name = log_path
        .file_name()
        .ok_or_else(|| Error::new(ErrorKind::InvalidInput, "log path has no file name"))?;
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();

    Ok(guard)
}
