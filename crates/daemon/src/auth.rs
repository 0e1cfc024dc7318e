// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Production stand-ins for the session/clan capabilities `breach-bus`
//! delegates to. Token verification and clan membership are owned by a
//! separate session service; this crate only needs something that
//! implements the trait so the bus and HTTP router can be wired up. The
//! bearer token is treated as already verified upstream and used directly
//! as the player id, the same trust boundary a gateway-fronted service
//! assumes of its ingress.

use async_trait::async_trait;
use breach_bus::{AuthError, ClanMembership, SessionVerifier};

pub struct PassthroughVerifier;

#[async_trait]
impl SessionVerifier for PassthroughVerifier {
    async fn verify(&self, token: &str) -> Result<String, AuthError> {
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }
        Ok(token.to_string())
    }
}

/// No clan data model exists in this service yet; every `clan:<id>` channel
/// subscription is refused until one does.
pub struct NoClanMembership;

#[async_trait]
impl ClanMembership for NoClanMembership {
    async fn is_member(&self, _player_id: &str, _clan_id: &str) -> bool {
        false
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
