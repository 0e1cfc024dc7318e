// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use breach_core::{Clock, FakeClock};

#[test]
fn admits_when_capacity_available_and_reports_free_afterward() {
    let mut accountant = ResourceAccountant::new();
    accountant.register_server("srv-1", ResourceShare::new(100, 100, 100));
    let clock = FakeClock::new();

    let result = accountant.try_admit("srv-1", "pid-1", ResourceShare::new(40, 10, 20), 5, clock.now());
    assert_eq!(result, AdmitResult::Ok);
    assert_eq!(accountant.free("srv-1"), ResourceShare::new(60, 90, 80));
}

#[test]
fn rejects_with_deficit_on_the_first_insufficient_dimension() {
    let mut accountant = ResourceAccountant::new();
    accountant.register_server("srv-1", ResourceShare::new(50, 100, 100));
    let clock = FakeClock::new();

    let result = accountant.try_admit("srv-1", "pid-1", ResourceShare::new(60, 10, 10), 5, clock.now());
    assert_eq!(result, AdmitResult::Insufficient { dimension: Dimension::Cpu, deficit: 10 });
}

#[test]
fn release_returns_the_full_reservation_and_frees_capacity() {
    let mut accountant = ResourceAccountant::new();
    accountant.register_server("srv-1", ResourceShare::new(100, 100, 100));
    let clock = FakeClock::new();
    accountant.try_admit("srv-1", "pid-1", ResourceShare::new(40, 10, 20), 5, clock.now());

    let released = accountant.release("srv-1", "pid-1").unwrap();
    assert_eq!(released, ResourceShare::new(40, 10, 20));
    assert_eq!(accountant.free("srv-1"), ResourceShare::new(100, 100, 100));
}

#[test]
fn reduce_to_keeps_ram_but_releases_cpu_and_net_on_pause() {
    let mut accountant = ResourceAccountant::new();
    accountant.register_server("srv-1", ResourceShare::new(100, 100, 100));
    let clock = FakeClock::new();
    let request = ResourceShare::new(40, 10, 20);
    accountant.try_admit("srv-1", "pid-1", request, 5, clock.now());

    let released = accountant.reduce_to("srv-1", "pid-1", request.ram_only());
    assert_eq!(released, ResourceShare::new(40, 0, 20));
    assert_eq!(accountant.free("srv-1"), ResourceShare::new(100, 90, 100));
}

#[test]
fn try_extend_re_admits_cpu_and_net_on_top_of_held_ram_on_resume() {
    let mut accountant = ResourceAccountant::new();
    accountant.register_server("srv-1", ResourceShare::new(100, 100, 100));
    let clock = FakeClock::new();
    let request = ResourceShare::new(40, 10, 20);
    accountant.try_admit("srv-1", "pid-1", request, 5, clock.now());
    accountant.reduce_to("srv-1", "pid-1", request.ram_only());

    let result = accountant.try_extend("srv-1", "pid-1", request.cpu_net_only());
    assert_eq!(result, AdmitResult::Ok);
    assert_eq!(accountant.free("srv-1"), ResourceShare::new(60, 90, 80));
}

#[test]
fn list_by_priority_orders_by_priority_desc_then_start_time_asc() {
    let mut accountant = ResourceAccountant::new();
    accountant.register_server("srv-1", ResourceShare::new(1000, 1000, 1000));
    let clock = FakeClock::new();

    accountant.try_admit("srv-1", "low-old", ResourceShare::new(1, 1, 1), 3, clock.now());
    clock.advance(std::time::Duration::from_secs(1));
    accountant.try_admit("srv-1", "high", ResourceShare::new(1, 1, 1), 7, clock.now());
    clock.advance(std::time::Duration::from_secs(1));
    accountant.try_admit("srv-1", "low-new", ResourceShare::new(1, 1, 1), 3, clock.now());

    assert_eq!(accountant.list_by_priority("srv-1"), vec!["high", "low-old", "low-new"]);
}

#[test]
fn unregistered_server_has_no_free_capacity() {
    let accountant = ResourceAccountant::new();
    assert_eq!(accountant.free("ghost"), ResourceShare::ZERO);
}
