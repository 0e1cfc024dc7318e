// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn software() -> Software {
    Software {
        software_id: "sw-1".into(),
        owner_id: "p1".into(),
        resident_server_id: "srv-1".into(),
        software_type: SoftwareType::PasswordCracker,
        version: 3,
        size_mb: 40,
        effectiveness: 0.7,
        stealth: 0.3,
        reliability: 0.9,
        min_cpu: 50,
        min_ram: 20,
        hidden: false,
    }
}

#[test]
fn fits_capacity_requires_both_dimensions() {
    let sw = software();
    assert!(sw.fits_capacity(50, 20));
    assert!(!sw.fits_capacity(49, 20));
    assert!(!sw.fits_capacity(50, 19));
}
