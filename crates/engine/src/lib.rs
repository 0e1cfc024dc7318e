// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Process engine: the state machine, resource accountant, timer wheel, and
//! effect layer that turn engine commands into durable events and bus
//! publications.

pub mod action;
pub mod detection;
mod effect_apply;
mod engine;
mod error;
mod resource_accountant;
mod scheduler;

pub use action::{contract_for, completion_effects, ActionContract, ActionInputs};
pub use detection::{roll as detection_roll, DetectionRoll, RollSource, ThreadRollSource};
pub use effect_apply::{resolve as resolve_effects, EffectError, ResolvedEffects};
pub use engine::{Engine, StartCommand, StartOutcome};
pub use error::RuntimeError;
pub use resource_accountant::{AdmitResult, Dimension, ResourceAccountant};
pub use scheduler::Scheduler;

#[cfg(any(test, feature = "test-support"))]
pub use detection::FixedRollSource;
