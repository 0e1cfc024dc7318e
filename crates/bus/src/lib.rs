// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Realtime event bus: per-connection subscription state, the WebSocket
//! JSON protocol, heartbeat and backpressure policy, and the axum upgrade
//! handler that ties them together.

pub mod connection;
pub mod error;
pub mod heartbeat;
pub mod protocol;
pub mod registry;
pub mod session;
pub mod ws;

pub use connection::{EnqueueOutcome, OutboundQueue, OutboundReceiver};
pub use error::BusError;
pub use heartbeat::{HeartbeatAction, HeartbeatPolicy};
pub use protocol::{frame_for_event, is_critical, ClientFrame, NotificationLevel, ServerFrame};
pub use registry::ChannelRegistry;
pub use session::{AuthError, ClanMembership, SessionVerifier};
pub use ws::{upgrade, BusState};

#[cfg(any(test, feature = "test-support"))]
pub use session::fake::{FakeClanMembership, FakeSessionVerifier};
