// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer identifier type for tracking scheduled timers.
//!
//! Timers are used by the scheduler to wake the engine for process
//! completion, detection rolls, and connection heartbeats.

crate::define_id! {
    /// Unique identifier for a scheduled timer.
    pub struct TimerId;
}

impl TimerId {
    /// Timer for a process's projected completion instant. At most one
    /// completion timer exists per pid at any moment.
    pub fn completion(pid: &str) -> Self {
        Self::new(format!("completion:{pid}"))
    }

    pub fn is_completion(&self) -> bool {
        self.0.starts_with("completion:")
    }

    /// Coarse snapshot tick used to emit progress updates on the bus at
    /// bounded frequency.
    pub fn progress_tick(pid: &str) -> Self {
        Self::new(format!("progress-tick:{pid}"))
    }

    pub fn is_progress_tick(&self) -> bool {
        self.0.starts_with("progress-tick:")
    }

    /// Per-tick detection roll for a running process.
    pub fn detection_roll(pid: &str) -> Self {
        Self::new(format!("detection:{pid}"))
    }

    pub fn is_detection_roll(&self) -> bool {
        self.0.starts_with("detection:")
    }

    /// Heartbeat deadline for a bus connection.
    pub fn connection_heartbeat(connection_id: &str) -> Self {
        Self::new(format!("heartbeat:{connection_id}"))
    }

    pub fn is_connection_heartbeat(&self) -> bool {
        self.0.starts_with("heartbeat:")
    }

    /// Extracts the pid portion if this timer is process-scoped.
    pub fn pid_str(&self) -> Option<&str> {
        self.0
            .strip_prefix("completion:")
            .or_else(|| self.0.strip_prefix("progress-tick:"))
            .or_else(|| self.0.strip_prefix("detection:"))
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
