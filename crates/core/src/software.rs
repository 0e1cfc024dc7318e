// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Software entities resident on servers: scanners, crackers, viruses, and
//! the files they operate on.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a software instance.
    #[derive(Default)]
    pub struct SoftwareId;
}

/// Taxonomy of installable software, matched to the process action table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftwareType {
    PortScanner,
    PasswordCracker,
    FtpClient,
    Virus,
    Firewall,
    LogDeleter,
    Spyware,
}

/// A software instance resident on exactly one server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Software {
    pub software_id: String,
    pub owner_id: String,
    pub resident_server_id: String,
    pub software_type: SoftwareType,
    pub version: u32,
    pub size_mb: u32,
    pub effectiveness: f64,
    pub stealth: f64,
    pub reliability: f64,
    pub min_cpu: u64,
    pub min_ram: u64,
    pub hidden: bool,
}

impl Software {
    /// Whether this software can run given a server's spare capacity.
    pub fn fits_capacity(&self, cpu_available: u64, ram_available: u64) -> bool {
        cpu_available >= self.min_cpu && ram_available >= self.min_ram
    }
}

#[cfg(test)]
#[path = "software_tests.rs"]
mod tests;
