// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Narrow capability traits the bus delegates to: session token
//! verification and clan membership checks. Production implementations
//! live downstream of this crate; tests use the fakes below.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid or expired token")]
    InvalidToken,
}

/// Verifies a session token and resolves it to a player id.
#[async_trait]
pub trait SessionVerifier: Send + Sync + 'static {
    async fn verify(&self, token: &str) -> Result<String, AuthError>;
}

/// Confirms whether a player belongs to a clan, gating `clan:<id>`
/// subscriptions.
#[async_trait]
pub trait ClanMembership: Send + Sync + 'static {
    async fn is_member(&self, player_id: &str, clan_id: &str) -> bool;
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use std::collections::{HashMap, HashSet};

    /// Accepts any token present in its table, mapping it to a player id.
    #[derive(Default)]
    pub struct FakeSessionVerifier {
        tokens: HashMap<String, String>,
    }

    impl FakeSessionVerifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_token(mut self, token: impl Into<String>, player_id: impl Into<String>) -> Self {
            self.tokens.insert(token.into(), player_id.into());
            self
        }
    }

    #[async_trait]
    impl SessionVerifier for FakeSessionVerifier {
        async fn verify(&self, token: &str) -> Result<String, AuthError> {
            self.tokens.get(token).cloned().ok_or(AuthError::InvalidToken)
        }
    }

    /// Membership table keyed by `(player_id, clan_id)`.
    #[derive(Default)]
    pub struct FakeClanMembership {
        members: HashSet<(String, String)>,
    }

    impl FakeClanMembership {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_member(mut self, player_id: impl Into<String>, clan_id: impl Into<String>) -> Self {
            self.members.insert((player_id.into(), clan_id.into()));
            self
        }
    }

    #[async_trait]
    impl ClanMembership for FakeClanMembership {
        async fn is_member(&self, player_id: &str, clan_id: &str) -> bool {
            self.members.contains(&(player_id.to_string(), clan_id.to_string()))
        }
    }
}
