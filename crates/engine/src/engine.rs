// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The process engine: the single-writer state machine that owns every
//! `Process` mutation.
//!
//! Callers (HTTP handlers, the bus, the daemon's timer loop) funnel through
//! an `Engine` one command at a time; the engine itself assumes exclusive
//! `&mut self` access and does no internal locking, the same way the
//! upstream runtime keeps one writer per domain and pushes concurrency out
//! to its callers.

use crate::action::{completion_effects, contract_for, ActionContract, ActionInputs};
use crate::detection::{self, RollSource};
use crate::effect_apply;
use crate::error::RuntimeError;
use crate::resource_accountant::{AdmitResult, ResourceAccountant};
use crate::scheduler::Scheduler;
use breach_adapters::{DurableStore, EventPublisher};
use breach_core::process::{Action, FailReason, PauseReason};
use breach_core::{Channel, Clock, Effect, Event, IdGen, Process, TimerId};
use breach_storage::MaterializedState;
use std::sync::Arc;
use std::time::Duration;

/// Coarse, bounded-rate cadence for `process:progress` bus updates. The
/// exact rate is implementation-defined; this just needs to be bounded.
const PROGRESS_TICK_INTERVAL: Duration = Duration::from_secs(2);

/// Inputs to `Engine::start` not already carried on `Process`.
pub struct StartCommand {
    pub creator_id: String,
    pub target_server_id: String,
    pub action: Action,
    pub software_id: Option<String>,
    pub inputs: ActionInputs,
    pub priority: u8,
    pub stealth_level: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    Admitted { pid: String },
    Failed { pid: String, reason: FailReason },
}

pub struct Engine<Store, Publisher, C: Clock, Ids: IdGen> {
    store: Store,
    publisher: Arc<Publisher>,
    clock: C,
    ids: Ids,
    state: MaterializedState,
    accountant: ResourceAccountant,
    scheduler: Scheduler,
    last_seq: u64,
}

impl<Store, Publisher, C, Ids> Engine<Store, Publisher, C, Ids>
where
    Store: DurableStore,
    Publisher: EventPublisher,
    C: Clock,
    Ids: IdGen,
{
    pub fn new(
        store: Store,
        publisher: Arc<Publisher>,
        clock: C,
        ids: Ids,
        state: MaterializedState,
        accountant: ResourceAccountant,
    ) -> Self {
        Self { store, publisher, clock, ids, state, accountant, scheduler: Scheduler::new(), last_seq: 0 }
    }

    pub fn state(&self) -> &MaterializedState {
        &self.state
    }

    /// Read-only copy of the current state with every running process's
    /// progress settled against the current clock, so a query between two
    /// committed transitions still reports live progress rather than the
    /// value as of the last pause/resume/completion.
    pub fn snapshot(&self) -> MaterializedState {
        let mut state = self.state.clone();
        for process in state.processes.values_mut() {
            process.settle_elapsed(&self.clock);
        }
        state
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Flush the durable store and snapshot the current state, truncating
    /// the WAL up to the last applied event. Called once on graceful
    /// shutdown; crash recovery replays from the WAL instead.
    pub fn checkpoint(&mut self) -> Result<(), RuntimeError> {
        self.store.flush()?;
        if self.last_seq > 0 {
            self.store.checkpoint(self.last_seq, &self.state)?;
        }
        Ok(())
    }

    /// Register a target server's CPU/RAM/NET capacity with the accountant.
    /// Called once per known server during startup.
    pub fn register_server(&mut self, server_id: impl Into<String>, capacity: breach_core::ResourceShare) {
        self.accountant.register_server(server_id, capacity);
    }

    /// Append and durably flush a single event before applying it to the
    /// in-memory view, so the caller is only acknowledged once the durable
    /// store has accepted the write.
    fn append(&mut self, event: Event) -> Result<(), RuntimeError> {
        let seq = self.store.append(&event)?;
        self.store.flush()?;
        self.state.apply_event(&event);
        self.last_seq = seq;
        Ok(())
    }

    async fn publish_all(&self, outbound: Vec<(Channel, Event)>) {
        for (channel, event) in outbound {
            if let Err(err) = self.publisher.publish(&channel, &event).await {
                tracing::warn!(%channel, error = %err, "bus publish failed");
            }
        }
    }

    /// Channels a process's terminal event fans out to: the creator always,
    /// plus the target server's owner when one is registered and isn't the
    /// creator itself (an attack against another player's server).
    fn process_channels(&self, creator_id: &str, target_server_id: &str) -> Vec<Channel> {
        let mut channels = vec![Channel::user(creator_id)];
        if let Some(victim_id) = self.state.servers.get(target_server_id).and_then(|s| s.owner_id.clone()) {
            if victim_id != creator_id {
                channels.push(Channel::user(victim_id));
            }
        }
        channels
    }

    /// `Start` command: admit immediately, evict lower-priority occupants on
    /// insufficient resources, and fail the process outright if admission
    /// still can't be made (RAM deficits are never resolved by eviction).
    pub async fn start(&mut self, cmd: StartCommand) -> Result<StartOutcome, RuntimeError> {
        let pid = self.ids.next();
        let contract: ActionContract = contract_for(&cmd.action, &cmd.inputs);

        let admitted = self.admit_with_eviction(
            &cmd.target_server_id,
            &pid,
            contract.resource_request,
            cmd.priority,
        );

        if !admitted {
            let event = Event::ProcessStarted {
                pid: pid.clone(),
                creator_id: cmd.creator_id.clone(),
                target_server_id: cmd.target_server_id.clone(),
                action: cmd.action.clone(),
                software_id: cmd.software_id.clone(),
                resource_request: contract.resource_request,
                ideal_duration_seconds: contract.ideal_duration_seconds,
                parent_pid: None,
                priority: cmd.priority,
                stealth_level: cmd.stealth_level,
                start_epoch_ms: self.clock.epoch_ms(),
            };
            self.append(event)?;
            let failed_event = Event::ProcessCompletedFail {
                pid: pid.clone(),
                reason: FailReason::NoResources,
                accumulated_worked_seconds: 0.0,
            };
            self.append(failed_event.clone())?;
            self.publish_all(vec![(Channel::user(cmd.creator_id.clone()), failed_event)]).await;
            return Ok(StartOutcome::Failed { pid, reason: FailReason::NoResources });
        }

        let start_event = Event::ProcessStarted {
            pid: pid.clone(),
            creator_id: cmd.creator_id,
            target_server_id: cmd.target_server_id,
            action: cmd.action,
            software_id: cmd.software_id,
            resource_request: contract.resource_request,
            ideal_duration_seconds: contract.ideal_duration_seconds,
            parent_pid: None,
            priority: cmd.priority,
            stealth_level: cmd.stealth_level,
            start_epoch_ms: self.clock.epoch_ms(),
        };
        self.append(start_event)?;
        self.scheduler.schedule(
            TimerId::completion(&pid),
            std::time::Duration::from_secs(contract.ideal_duration_seconds),
            self.clock.now(),
        );
        self.scheduler.schedule(TimerId::progress_tick(&pid), PROGRESS_TICK_INTERVAL, self.clock.now());
        Ok(StartOutcome::Admitted { pid })
    }

    /// Strictly admit `request` on `server_id`; on failure, walk the
    /// eviction order from the tail and pause lower-priority candidates
    /// until admission succeeds or no evictable candidate remains.
    fn admit_with_eviction(&mut self, server_id: &str, pid: &str, request: breach_core::ResourceShare, priority: u8) -> bool {
        if self.accountant.try_admit(server_id, pid, request, priority, self.clock.now()) == AdmitResult::Ok {
            return true;
        }

        loop {
            let candidate = self
                .accountant
                .list_by_priority(server_id)
                .into_iter()
                .rev()
                .find(|candidate_pid| {
                    self.state
                        .get_process(candidate_pid)
                        .map(|p| p.priority < priority && p.state.is_running())
                        .unwrap_or(false)
                });

            let Some(candidate_pid) = candidate else {
                return false;
            };

            self.pause_for_eviction(&candidate_pid);

            if self.accountant.try_admit(server_id, pid, request, priority, self.clock.now()) == AdmitResult::Ok {
                return true;
            }
        }
    }

    fn pause_for_eviction(&mut self, pid: &str) {
        let Some(process) = self.state.get_process(pid) else { return };
        let server_id = process.target_server_id.clone();
        let mut settled = process.clone();
        settled.settle_elapsed(&self.clock);

        self.scheduler.cancel_all_for_pid(pid);
        self.accountant.reduce_to(&server_id, pid, settled.resource_request.ram_only());
        if let Err(err) = self.append(Event::ProcessPaused {
            pid: pid.to_string(),
            reason: PauseReason::Resource,
            accumulated_worked_seconds: settled.accumulated_worked_seconds,
        }) {
            tracing::error!(pid, error = %err, "failed to durably record eviction pause");
        }
    }

    /// `Pause(pid, reason)`: only permitted while RUNNING.
    pub fn pause(&mut self, pid: &str, reason: PauseReason) -> Result<(), RuntimeError> {
        let process = self.state.get_process(pid).ok_or_else(|| RuntimeError::ProcessNotFound(pid.to_string()))?;
        if !process.state.is_running() {
            return Err(RuntimeError::InvalidTransition { pid: pid.to_string(), reason: "pause requires RUNNING" });
        }
        let server_id = process.target_server_id.clone();
        let mut settled = process.clone();
        settled.settle_elapsed(&self.clock);

        self.scheduler.cancel_all_for_pid(pid);
        self.accountant.reduce_to(&server_id, pid, settled.resource_request.ram_only());
        self.append(Event::ProcessPaused {
            pid: pid.to_string(),
            reason,
            accumulated_worked_seconds: settled.accumulated_worked_seconds,
        })
    }

    /// `Resume(pid)`: only permitted while PAUSED and the accountant can
    /// re-admit the CPU/NET share on top of the RAM already held.
    pub fn resume(&mut self, pid: &str) -> Result<bool, RuntimeError> {
        let process = self.state.get_process(pid).ok_or_else(|| RuntimeError::ProcessNotFound(pid.to_string()))?;
        if !process.state.is_paused() {
            return Err(RuntimeError::InvalidTransition { pid: pid.to_string(), reason: "resume requires PAUSED" });
        }
        let server_id = process.target_server_id.clone();
        let remaining = process.remaining_seconds();
        let cpu_net = process.resource_request.cpu_net_only();

        if self.accountant.try_extend(&server_id, pid, cpu_net) != AdmitResult::Ok {
            return Ok(false);
        }

        self.scheduler.schedule(TimerId::completion(pid), std::time::Duration::from_secs_f64(remaining), self.clock.now());
        self.scheduler.schedule(TimerId::progress_tick(pid), PROGRESS_TICK_INTERVAL, self.clock.now());
        self.append(Event::ProcessResumed { pid: pid.to_string() })?;
        Ok(true)
    }

    /// `Cancel(pid)`: accepted from any non-terminal state, never blocks.
    /// Terminal pids absorb the command as a no-op.
    pub async fn cancel(&mut self, pid: &str) -> Result<(), RuntimeError> {
        let Some(process) = self.state.get_process(pid) else {
            return Err(RuntimeError::ProcessNotFound(pid.to_string()));
        };
        if process.state.is_terminal() {
            return Ok(());
        }
        let server_id = process.target_server_id.clone();
        let creator_id = process.creator_id.clone();
        let mut settled = process.clone();
        settled.settle_elapsed(&self.clock);

        self.scheduler.cancel_all_for_pid(pid);
        self.accountant.release(&server_id, pid);
        self.append(Event::ProcessCancelled { pid: pid.to_string(), accumulated_worked_seconds: settled.accumulated_worked_seconds })?;
        self.publish_all(vec![(
            Channel::user(creator_id.clone()),
            Event::Notification { player_id: creator_id, message: "Process cancelled".to_string() },
        )])
        .await;

        self.auto_resume(&server_id).await?;
        Ok(())
    }

    /// `Tick(pid)`: a completion timer fired. Recompute progress; complete
    /// if it has reached 1.0, otherwise this was a stray/coarse tick and the
    /// existing timer keeps running.
    pub async fn tick(&mut self, pid: &str) -> Result<(), RuntimeError> {
        let Some(process) = self.state.get_process(pid) else {
            return Err(RuntimeError::ProcessNotFound(pid.to_string()));
        };
        if !process.state.is_running() {
            return Ok(());
        }
        let server_id = process.target_server_id.clone();
        let creator_id = process.creator_id.clone();
        let mut settled = process.clone();
        settled.settle_elapsed(&self.clock);

        if settled.progress() < 1.0 {
            return Ok(());
        }

        self.scheduler.cancel_all_for_pid(pid);
        self.accountant.release(&server_id, pid);
        let completed_event = Event::ProcessCompletedOk {
            pid: pid.to_string(),
            accumulated_worked_seconds: settled.accumulated_worked_seconds,
        };
        self.append(completed_event.clone())?;

        let channels = self.process_channels(&creator_id, &server_id);
        self.publish_all(channels.into_iter().map(|channel| (channel, completed_event.clone())).collect()).await;

        self.apply_completion_effects(&settled).await?;
        self.auto_resume(&server_id).await?;
        Ok(())
    }

    /// Drain every timer whose deadline has passed and dispatch it. Meant
    /// to be polled by the daemon on a short fixed interval; `Scheduler`
    /// itself has no wake mechanism of its own.
    pub async fn process_due_timers(&mut self) -> Result<(), RuntimeError> {
        let now = self.clock.now();
        let due = self.scheduler.fired(now);
        for timer_id in due {
            if timer_id.is_completion() {
                if let Some(pid) = timer_id.pid_str() {
                    self.tick(pid).await?;
                }
            } else if timer_id.is_progress_tick() {
                if let Some(pid) = timer_id.pid_str() {
                    self.progress_tick(pid).await?;
                }
            }
        }
        Ok(())
    }

    /// Publish a coarse `process:progress` event for a still-running process
    /// and reschedule the next tick. A stray fire against a pid that's
    /// already paused or terminal is a no-op.
    async fn progress_tick(&mut self, pid: &str) -> Result<(), RuntimeError> {
        let Some(process) = self.state.get_process(pid) else { return Ok(()) };
        if !process.state.is_running() {
            return Ok(());
        }
        let creator_id = process.creator_id.clone();
        let mut settled = process.clone();
        settled.settle_elapsed(&self.clock);
        let progress = settled.progress();

        let event = Event::ProcessProgress { pid: pid.to_string(), progress };
        self.append(event.clone())?;
        self.scheduler.schedule(TimerId::progress_tick(pid), PROGRESS_TICK_INTERVAL, self.clock.now());
        self.publish_all(vec![(Channel::user(creator_id), event)]).await;
        Ok(())
    }

    /// Roll detection for every running process against its target's
    /// current monitoring level. Called by the daemon on a bounded
    /// interval rather than per-completion-timer, since the spec leaves
    /// the roll frequency implementation-defined. Never pauses or cancels
    /// anything; on trigger it durably raises `detection_risk` and
    /// publishes a `SecurityEvent` to the victim's channel.
    pub async fn detection_tick(&mut self, roll_source: &dyn RollSource) -> Result<(), RuntimeError> {
        let running_pids: Vec<String> =
            self.state.processes.values().filter(|p| p.state.is_running()).map(|p| p.pid.clone()).collect();

        let mut outbound = Vec::new();
        for pid in running_pids {
            let Some(process) = self.state.get_process(&pid) else { continue };
            let monitoring_level = self.state.servers.get(&process.target_server_id).map(|s| s.monitoring_level).unwrap_or(0);
            let victim_id =
                self.state.servers.get(&process.target_server_id).and_then(|s| s.owner_id.clone()).unwrap_or_default();
            if victim_id.is_empty() {
                continue;
            }

            let roll = detection::roll(process, monitoring_level, &victim_id, roll_source);
            if let Some(event) = roll.event {
                self.append(event.clone())?;
                outbound.push((Channel::user(victim_id), event));
            }
        }
        self.publish_all(outbound).await;
        Ok(())
    }

    async fn apply_completion_effects(&mut self, process: &Process) -> Result<(), RuntimeError> {
        let home_server_id = self
            .state
            .players
            .get(&process.creator_id)
            .map(|p| p.home_server_id.clone())
            .unwrap_or_default();
        let effects: Vec<Effect> = completion_effects(process, &home_server_id, self.clock.epoch_ms());

        let resolved = match effect_apply::resolve(&effects, &self.state, self.clock.epoch_ms()) {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::warn!(pid = %process.pid, error = %err, "effect transaction rejected");
                return Ok(());
            }
        };

        for event in resolved.events {
            self.append(event)?;
        }
        self.publish_all(resolved.outbound).await;
        Ok(())
    }

    /// After any release, resume PAUSED processes on `server_id` in
    /// priority order, stopping at the first one that still can't fit.
    async fn auto_resume(&mut self, server_id: &str) -> Result<(), RuntimeError> {
        let candidates: Vec<String> = self
            .state
            .processes_by_target_server(server_id)
            .into_iter()
            .filter(|p| p.is_auto_resumable())
            .map(|p| p.pid.clone())
            .collect();

        for pid in candidates {
            if !self.resume(&pid)? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
