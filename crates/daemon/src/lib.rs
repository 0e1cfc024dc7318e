// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Wires the process engine, durable storage, the realtime bus, and the
//! HTTP API into a runnable daemon: typed env config, crash recovery and
//! graceful shutdown, the single-writer command-queue actor in front of
//! `Engine`, the bus-backed `EventPublisher`, and the axum router.

pub mod auth;
pub mod engine_actor;
pub mod env;
pub mod lifecycle;
pub mod publish;
pub mod router;

pub use auth::{NoClanMembership, PassthroughVerifier};
pub use engine_actor::{spawn as spawn_engine_actor, EngineCallError, EngineHandle};
pub use env::Config;
pub use lifecycle::{shutdown, startup, LifecycleError, StartupResult};
pub use publish::BusPublisher;
pub use router::{router, AppState};
