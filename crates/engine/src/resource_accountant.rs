// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-server CPU/RAM/NET budget tracking.
//!
//! The accountant never unilaterally pauses anything — it only reports
//! whether a request fits and hands back the eviction order; the engine
//! decides who gets paused. It is a pure function of the reservations it
//! has been told about, so it needs no locking beyond what the engine's
//! single-writer command loop already provides.

use breach_core::ResourceShare;
use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Cpu,
    Ram,
    Net,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitResult {
    Ok,
    Insufficient { dimension: Dimension, deficit: u64 },
}

#[derive(Debug, Clone)]
struct Reservation {
    share: ResourceShare,
    priority: u8,
    started_at: Instant,
}

#[derive(Debug, Default)]
pub struct ResourceAccountant {
    capacities: HashMap<String, ResourceShare>,
    reservations: HashMap<String, HashMap<String, Reservation>>,
}

impl ResourceAccountant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_server(&mut self, server_id: impl Into<String>, capacity: ResourceShare) {
        self.capacities.insert(server_id.into(), capacity);
    }

    /// Current free capacity on a server. Unregistered servers have none.
    pub fn free(&self, server_id: &str) -> ResourceShare {
        let Some(&total) = self.capacities.get(server_id) else {
            return ResourceShare::ZERO;
        };
        let used = self.used(server_id);
        total.saturating_sub(&used)
    }

    fn used(&self, server_id: &str) -> ResourceShare {
        self.reservations
            .get(server_id)
            .map(|reservations| {
                reservations
                    .values()
                    .fold(ResourceShare::ZERO, |acc, r| acc + r.share)
            })
            .unwrap_or(ResourceShare::ZERO)
    }

    /// Strictly allocate `request` for `pid` on `server_id`. Fails without
    /// partial allocation — a deficit on any dimension rejects the whole
    /// request.
    pub fn try_admit(
        &mut self,
        server_id: &str,
        pid: &str,
        request: ResourceShare,
        priority: u8,
        now: Instant,
    ) -> AdmitResult {
        let free = self.free(server_id);
        if let Some(result) = deficit(free, request) {
            return result;
        }
        self.reservations.entry(server_id.to_string()).or_default().insert(
            pid.to_string(),
            Reservation { share: request, priority, started_at: now },
        );
        AdmitResult::Ok
    }

    /// Add `additional` on top of an existing reservation (used on
    /// `Resume`, where RAM is already held and only CPU/NET need to be
    /// re-admitted).
    pub fn try_extend(&mut self, server_id: &str, pid: &str, additional: ResourceShare) -> AdmitResult {
        let free = self.free(server_id);
        if let Some(result) = deficit(free, additional) {
            return result;
        }
        if let Some(reservation) = self
            .reservations
            .get_mut(server_id)
            .and_then(|reservations| reservations.get_mut(pid))
        {
            reservation.share = reservation.share + additional;
        }
        AdmitResult::Ok
    }

    /// Shrink a reservation to `new_share` (used on `Pause`, where CPU/NET
    /// are released but RAM is kept). Returns the released delta.
    pub fn reduce_to(&mut self, server_id: &str, pid: &str, new_share: ResourceShare) -> ResourceShare {
        if let Some(reservation) = self
            .reservations
            .get_mut(server_id)
            .and_then(|reservations| reservations.get_mut(pid))
        {
            let released = reservation.share.saturating_sub(&new_share);
            reservation.share = new_share;
            released
        } else {
            ResourceShare::ZERO
        }
    }

    /// Release a process's entire reservation, returning what it held.
    pub fn release(&mut self, server_id: &str, pid: &str) -> Option<ResourceShare> {
        self.reservations
            .get_mut(server_id)
            .and_then(|reservations| reservations.remove(pid))
            .map(|r| r.share)
    }

    /// Non-terminal pids on `server_id`, ordered `(priority desc, start_time asc)` —
    /// the eviction order: lowest priority, oldest first, is the tail.
    pub fn list_by_priority(&self, server_id: &str) -> Vec<String> {
        let Some(reservations) = self.reservations.get(server_id) else {
            return Vec::new();
        };
        let mut entries: Vec<(&String, &Reservation)> = reservations.iter().collect();
        entries.sort_by(|(_, a), (_, b)| b.priority.cmp(&a.priority).then(a.started_at.cmp(&b.started_at)));
        entries.into_iter().map(|(pid, _)| pid.clone()).collect()
    }
}

fn deficit(free: ResourceShare, request: ResourceShare) -> Option<AdmitResult> {
    if request.cpu > free.cpu {
        return Some(AdmitResult::Insufficient { dimension: Dimension::Cpu, deficit: request.cpu - free.cpu });
    }
    if request.ram > free.ram {
        return Some(AdmitResult::Insufficient { dimension: Dimension::Ram, deficit: request.ram - free.ram });
    }
    if request.net > free.net {
        return Some(AdmitResult::Insufficient { dimension: Dimension::Net, deficit: request.net - free.net });
    }
    None
}

#[cfg(test)]
#[path = "resource_accountant_tests.rs"]
mod tests;
