//! Connection handle and lifecycle.
//!
//! `ConnectionHandle` はハブがコネクションに対して持つ唯一の参照。
//! ソケットそのものは持たず、送信キューと切断シグナルだけを持つ。

use std::{fmt, sync::Arc};

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

use super::{
    entity::Participant,
    event::ServerEvent,
    value_object::{ConnectionId, RoomId},
};

/// Bounded outbound queue feeding a connection's write loop
pub type PusherChannel = mpsc::Sender<Arc<ServerEvent>>;

/// Receiving half of [`PusherChannel`], owned by the write loop
pub type PusherReceiver = mpsc::Receiver<Arc<ServerEvent>>;

/// Create an outbound queue with the given capacity.
///
/// # Panics
///
/// Panics if `capacity` is zero (`HubConfig` rejects that value).
pub fn pusher_channel(capacity: usize) -> (PusherChannel, PusherReceiver) {
    mpsc::channel(capacity)
}

/// Outcome of a non-blocking delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Queued,
    /// Queue was full; the connection has been told to close
    Evicted,
    /// Write loop already gone, or the connection is closing
    Closed,
}

/// What the hub keeps for each attached connection
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub room_id: RoomId,
    pub participant: Participant,
    sender: PusherChannel,
    closer: CancellationToken,
}

impl ConnectionHandle {
    pub fn new(
        room_id: RoomId,
        participant: Participant,
        sender: PusherChannel,
        closer: CancellationToken,
    ) -> Self {
        Self {
            id: ConnectionId::generate(),
            room_id,
            participant,
            sender,
            closer,
        }
    }

    /// Queue `event` without waiting.
    ///
    /// A full queue means the peer is not keeping up: the connection is
    /// closed instead of making the caller wait. A connection that was
    /// already told to close only reports `Closed`.
    pub fn deliver(&self, event: Arc<ServerEvent>) -> Delivery {
        if self.closer.is_cancelled() {
            return Delivery::Closed;
        }
        match self.sender.try_send(event) {
            Ok(()) => Delivery::Queued,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    connection_id = %self.id,
                    room_id = %self.room_id,
                    user_id = %self.participant.user_id,
                    "Outbound queue full, evicting slow consumer"
                );
                self.closer.cancel();
                Delivery::Evicted
            }
            Err(TrySendError::Closed(_)) => Delivery::Closed,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closer.is_cancelled()
    }
}

/// Connection lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Bootstrap handshake in progress
    Connecting,
    /// Registered with the room registry
    Active,
    /// Socket failed or queue closed; cleanup running
    Draining,
    /// Both loops exited and the socket is released
    Closed,
}

impl ConnectionState {
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Connecting, Active) | (Connecting, Draining) | (Active, Draining) | (Draining, Closed)
        )
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Active => "active",
            ConnectionState::Draining => "draining",
            ConnectionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Tracks the state of one connection and logs each transition
#[derive(Debug)]
pub struct ConnectionLifecycle {
    connection_id: ConnectionId,
    state: ConnectionState,
}

impl ConnectionLifecycle {
    pub fn new(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            state: ConnectionState::Connecting,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Move to `next`. Invalid transitions are logged and ignored.
    pub fn advance(&mut self, next: ConnectionState) -> bool {
        if !self.state.can_transition_to(next) {
            tracing::warn!(
                connection_id = %self.connection_id,
                "Ignoring invalid connection transition {} -> {}",
                self.state,
                next
            );
            return false;
        }
        tracing::debug!(
            connection_id = %self.connection_id,
            "Connection {} -> {}",
            self.state,
            next
        );
        self.state = next;
        true
    }
}
