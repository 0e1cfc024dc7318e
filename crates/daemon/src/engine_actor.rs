// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single-writer command queue in front of `Engine`.
//!
//! Every mutation — HTTP-originated commands and timer fires alike — funnels
//! through this actor's mpsc channel and is executed in arrival order, the
//! way the concurrency model requires. `EngineHandle` is the cheap, cloneable
//! front door HTTP handlers hold; only the actor task itself ever touches
//! `Engine` directly.

use breach_adapters::{DurableStore, EventPublisher};
use breach_core::process::PauseReason;
use breach_core::{Clock, IdGen};
use breach_engine::detection::RollSource;
use breach_engine::{Engine, RuntimeError, StartCommand, StartOutcome};
use breach_storage::MaterializedState;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

enum EngineCommand {
    Start { cmd: StartCommand, reply: oneshot::Sender<Result<StartOutcome, RuntimeError>> },
    Pause { pid: String, reason: PauseReason, reply: oneshot::Sender<Result<(), RuntimeError>> },
    Resume { pid: String, reply: oneshot::Sender<Result<bool, RuntimeError>> },
    Cancel { pid: String, reply: oneshot::Sender<Result<(), RuntimeError>> },
    Snapshot { reply: oneshot::Sender<MaterializedState> },
    Shutdown { reply: oneshot::Sender<Result<(), RuntimeError>> },
}

#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineCommand>,
}

/// Either the engine rejected the command, or the actor task is gone
/// (process shutting down).
#[derive(Debug, thiserror::Error)]
pub enum EngineCallError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("engine actor has shut down")]
    ActorGone,
}

impl EngineHandle {
    pub async fn start(&self, cmd: StartCommand) -> Result<StartOutcome, EngineCallError> {
        self.call(|reply| EngineCommand::Start { cmd, reply }).await
    }

    pub async fn pause(&self, pid: impl Into<String>, reason: PauseReason) -> Result<(), EngineCallError> {
        let pid = pid.into();
        self.call(|reply| EngineCommand::Pause { pid, reason, reply }).await
    }

    pub async fn resume(&self, pid: impl Into<String>) -> Result<bool, EngineCallError> {
        let pid = pid.into();
        self.call(|reply| EngineCommand::Resume { pid, reply }).await
    }

    pub async fn cancel(&self, pid: impl Into<String>) -> Result<(), EngineCallError> {
        let pid = pid.into();
        self.call(|reply| EngineCommand::Cancel { pid, reply }).await
    }

    /// Read-only clone of the current materialized state, for HTTP GETs.
    pub async fn snapshot(&self) -> Result<MaterializedState, EngineCallError> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(EngineCommand::Snapshot { reply }).await.map_err(|_| EngineCallError::ActorGone)?;
        rx.await.map_err(|_| EngineCallError::ActorGone)
    }

    /// Flush and checkpoint the durable store. Called once during graceful
    /// shutdown, before the process exits.
    pub async fn shutdown(&self) -> Result<(), EngineCallError> {
        self.call(|reply| EngineCommand::Shutdown { reply }).await
    }

    async fn call<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, RuntimeError>>) -> EngineCommand,
    ) -> Result<T, EngineCallError> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(build(reply)).await.map_err(|_| EngineCallError::ActorGone)?;
        rx.await.map_err(|_| EngineCallError::ActorGone)?.map_err(EngineCallError::from)
    }
}

/// Spawn the actor task. Returns the handle HTTP layers clone freely; the
/// task itself runs until every `EngineHandle` is dropped.
pub fn spawn<Store, Publisher, C, Ids>(
    mut engine: Engine<Store, Publisher, C, Ids>,
    roll_source: Box<dyn RollSource>,
    timer_poll_interval: Duration,
    detection_interval: Duration,
) -> EngineHandle
where
    Store: DurableStore,
    Publisher: EventPublisher,
    C: Clock,
    Ids: IdGen,
{
    let (tx, mut rx) = mpsc::channel(256);

    tokio::spawn(async move {
        let mut timer_tick = tokio::time::interval(timer_poll_interval);
        let mut detection_tick = tokio::time::interval(detection_interval);

        loop {
            tokio::select! {
                cmd = rx.recv() => {
                    let Some(cmd) = cmd else { break };
                    dispatch(&mut engine, cmd).await;
                }
                _ = timer_tick.tick() => {
                    if let Err(err) = engine.process_due_timers().await {
                        tracing::error!(error = %err, "timer processing failed");
                    }
                }
                _ = detection_tick.tick() => {
                    if let Err(err) = engine.detection_tick(roll_source.as_ref()).await {
                        tracing::error!(error = %err, "detection tick failed");
                    }
                }
            }
        }
    });

    EngineHandle { tx }
}

async fn dispatch<Store, Publisher, C, Ids>(engine: &mut Engine<Store, Publisher, C, Ids>, cmd: EngineCommand)
where
    Store: DurableStore,
    Publisher: EventPublisher,
    C: Clock,
    Ids: IdGen,
{
    match cmd {
        EngineCommand::Start { cmd, reply } => {
            let _ = reply.send(engine.start(cmd).await);
        }
        EngineCommand::Pause { pid, reason, reply } => {
            let _ = reply.send(engine.pause(&pid, reason));
        }
        EngineCommand::Resume { pid, reply } => {
            let _ = reply.send(engine.resume(&pid));
        }
        EngineCommand::Cancel { pid, reply } => {
            let _ = reply.send(engine.cancel(&pid).await);
        }
        EngineCommand::Snapshot { reply } => {
            let _ = reply.send(engine.snapshot());
        }
        EngineCommand::Shutdown { reply } => {
            let _ = reply.send(engine.checkpoint());
        }
    }
}

#[cfg(test)]
#[path = "engine_actor_tests.rs"]
mod tests;
