// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The axum WebSocket upgrade handler and per-connection driver loop.
//!
//! One task per connection: a single `tokio::select!` arbitrates between
//! inbound client frames, outbound queue drains, and the heartbeat tick, so
//! a slow or silent client never blocks delivery to any other connection.

use crate::connection::OutboundQueue;
use crate::heartbeat::{HeartbeatAction, HeartbeatPolicy};
use crate::protocol::{ClientFrame, ServerFrame};
use crate::registry::ChannelRegistry;
use crate::session::{AuthError, ClanMembership, SessionVerifier};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use breach_core::{Channel, Clock, ConnectionId, Subscription};
use std::sync::Arc;
use std::time::Duration;

/// WebSocket-close status code used when a connection is torn down for
/// violating the backpressure or auth policy.
const POLICY_VIOLATION: u16 = 1008;

pub struct BusState<V, M, C> {
    pub registry: Arc<ChannelRegistry>,
    pub verifier: Arc<V>,
    pub clan_membership: Arc<M>,
    pub clock: C,
    pub heartbeat: HeartbeatPolicy,
    pub outbound_capacity: usize,
    pub auth_timeout: Duration,
}

pub async fn upgrade<V, M, C>(ws: WebSocketUpgrade, State(state): State<Arc<BusState<V, M, C>>>) -> impl IntoResponse
where
    V: SessionVerifier,
    M: ClanMembership,
    C: Clock,
{
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket<V, M, C>(mut socket: WebSocket, state: Arc<BusState<V, M, C>>)
where
    V: SessionVerifier,
    M: ClanMembership,
    C: Clock,
{
    let connection_id = ConnectionId::new(uuid::Uuid::new_v4().to_string());

    let player_id = match authenticate(&mut socket, &state).await {
        Ok(player_id) => player_id,
        Err(reason) => {
            let _ = send_frame(&mut socket, &ServerFrame::AuthResponse { success: false, reason: Some(reason) }).await;
            return;
        }
    };

    let _ = send_frame(&mut socket, &ServerFrame::AuthResponse { success: true, reason: None }).await;

    let (queue, mut outbound) = OutboundQueue::new(state.outbound_capacity);
    state.registry.register_connection(connection_id.clone(), queue);

    let mut subscription = Subscription::authenticated(connection_id.as_str(), &player_id, state.clock.epoch_ms());
    state.registry.subscribe(&connection_id, Channel::user(player_id.clone()));
    state
        .registry
        .publish_frame(&Channel::user(player_id.clone()), ServerFrame::Connected { connection_id: connection_id.to_string() });

    let mut heartbeat_tick = tokio::time::interval(Duration::from_millis(state.heartbeat.interval_ms));
    heartbeat_tick.tick().await;
    let mut close_code = axum::extract::ws::close_code::NORMAL;

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                let Some(Ok(message)) = incoming else { break };
                subscription.last_client_seen_epoch_ms = state.clock.epoch_ms();
                match message {
                    Message::Text(text) => {
                        let Ok(frame) = serde_json::from_str::<ClientFrame>(&text) else { continue };
                        if matches!(frame, ClientFrame::Ping) {
                            subscription.last_pong_epoch_ms = state.clock.epoch_ms();
                        }
                        if let Some(reply) = handle_client_frame(frame, &mut subscription, &connection_id, &state).await {
                            if send_frame(&mut socket, &reply).await.is_err() {
                                break;
                            }
                        }
                    }
                    Message::Pong(_) => {
                        subscription.last_pong_epoch_ms = state.clock.epoch_ms();
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            frame = outbound.recv() => {
                let Some(frame) = frame else {
                    if outbound.is_force_closed() {
                        close_code = POLICY_VIOLATION;
                    }
                    break;
                };
                if send_frame(&mut socket, &frame).await.is_err() {
                    break;
                }
            }
            _ = heartbeat_tick.tick() => {
                match state.heartbeat.evaluate(&subscription, state.clock.epoch_ms()) {
                    HeartbeatAction::Healthy => {}
                    HeartbeatAction::SendPing => {
                        if socket.send(Message::Ping(Vec::new())).await.is_err() {
                            break;
                        }
                    }
                    HeartbeatAction::CloseTimeout => break,
                }
            }
        }
    }

    state.registry.remove_connection(&connection_id);
    let _ = socket
        .send(Message::Close(Some(axum::extract::ws::CloseFrame { code: close_code, reason: "".into() })))
        .await;
}

async fn authenticate<V, M, C>(socket: &mut WebSocket, state: &Arc<BusState<V, M, C>>) -> Result<String, String>
where
    V: SessionVerifier,
    M: ClanMembership,
    C: Clock,
{
    let next = tokio::time::timeout(state.auth_timeout, socket.recv()).await;
    let Ok(Some(Ok(Message::Text(text)))) = next else {
        return Err("auth frame not received in time".to_string());
    };
    let Ok(ClientFrame::Auth { token }) = serde_json::from_str::<ClientFrame>(&text) else {
        return Err("expected auth frame".to_string());
    };
    state.verifier.verify(&token).await.map_err(|AuthError::InvalidToken| "invalid token".to_string())
}

/// Handle one decoded client frame, returning a direct reply (if any). Bus
/// publications (subscribe/unsubscribe results) are side effects on the
/// registry and never routed through this return value.
async fn handle_client_frame<V, M, C>(
    frame: ClientFrame,
    subscription: &mut Subscription,
    connection_id: &ConnectionId,
    state: &Arc<BusState<V, M, C>>,
) -> Option<ServerFrame>
where
    V: SessionVerifier,
    M: ClanMembership,
    C: Clock,
{
    match frame {
        ClientFrame::Auth { .. } => None,
        ClientFrame::Ping => Some(ServerFrame::Pong),
        ClientFrame::Subscribe { channel } => {
            let Ok(channel) = channel.parse::<Channel>() else {
                return Some(ServerFrame::Error { message: format!("unrecognised channel: {channel}") });
            };
            if let Channel::Clan(clan_id) = &channel {
                if !state.clan_membership.is_member(&subscription.player_id, clan_id).await {
                    return Some(ServerFrame::Error { message: "not a member of that clan".to_string() });
                }
            }
            subscription.subscribe(channel.clone());
            state.registry.subscribe(connection_id, channel);
            None
        }
        ClientFrame::Unsubscribe { channel } => {
            if let Ok(channel) = channel.parse::<Channel>() {
                subscription.unsubscribe(&channel);
                state.registry.unsubscribe(connection_id, &channel);
            }
            None
        }
        ClientFrame::ChatMessage { channel, body } => {
            let Ok(channel) = channel.parse::<Channel>() else { return None };
            if subscription.is_subscribed(&channel) {
                state.registry.publish_frame(
                    &channel,
                    ServerFrame::Notification {
                        title: "chat".to_string(),
                        message: body,
                        level: crate::protocol::NotificationLevel::Info,
                    },
                );
            }
            None
        }
        ClientFrame::SessionUpdate { .. } => None,
    }
}

async fn send_frame(socket: &mut WebSocket, frame: &ServerFrame) -> Result<(), axum::Error> {
    let text = serde_json::to_string(frame).unwrap_or_default();
    socket.send(Message::Text(text)).await
}
