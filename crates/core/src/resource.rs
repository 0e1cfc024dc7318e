// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource accounting primitives shared by server hardware capacities and
//! per-process resource requests.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A CPU/RAM/NET triple. Units are abstract (engine-defined "points"); the
/// accountant only ever compares shares against other shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResourceShare {
    pub cpu: u64,
    pub ram: u64,
    pub net: u64,
}

impl ResourceShare {
    pub const ZERO: ResourceShare = ResourceShare {
        cpu: 0,
        ram: 0,
        net: 0,
    };

    pub fn new(cpu: u64, ram: u64, net: u64) -> Self {
        Self { cpu, ram, net }
    }

    /// True if every dimension of `self` is greater than or equal to `other`.
    pub fn covers(&self, other: &ResourceShare) -> bool {
        self.cpu >= other.cpu && self.ram >= other.ram && self.net >= other.net
    }

    /// Component-wise saturating subtraction, never underflowing below zero.
    pub fn saturating_sub(&self, other: &ResourceShare) -> ResourceShare {
        ResourceShare {
            cpu: self.cpu.saturating_sub(other.cpu),
            ram: self.ram.saturating_sub(other.ram),
            net: self.net.saturating_sub(other.net),
        }
    }

    /// Only the CPU and NET components, used when a paused process releases
    /// its schedulable share but keeps RAM and connection slots held.
    pub fn cpu_net_only(&self) -> ResourceShare {
        ResourceShare {
            cpu: self.cpu,
            ram: 0,
            net: self.net,
        }
    }

    pub fn ram_only(&self) -> ResourceShare {
        ResourceShare {
            cpu: 0,
            ram: self.ram,
            net: 0,
        }
    }
}

impl Add for ResourceShare {
    type Output = ResourceShare;
    fn add(self, rhs: ResourceShare) -> ResourceShare {
        ResourceShare {
            cpu: self.cpu + rhs.cpu,
            ram: self.ram + rhs.ram,
            net: self.net + rhs.net,
        }
    }
}

impl Sub for ResourceShare {
    type Output = ResourceShare;
    fn sub(self, rhs: ResourceShare) -> ResourceShare {
        self.saturating_sub(&rhs)
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
