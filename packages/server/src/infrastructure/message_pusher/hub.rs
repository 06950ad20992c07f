//! プロセス内の MessagePusher 実装
//!
//! ## 責務
//!
//! - Room Registry と Call Presence Tracker を 1 つのロックで保護
//! - ルーム単位のファンアウト（送信キューが満杯のコネクションは切断）
//!
//! ## 設計ノート
//!
//! キューへの投入は `try_send` のみで待たないため、ロックを保持したまま
//! 配信する。スナップショットの取得と配信が同じ排他区間に入るので、
//! 並行する参加・離脱があっても古いスナップショットが新しいものの後に
//! 届くことはない。遅いクライアントがルーム全体を止めることもない。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    BroadcastReport, CallPresence, ConnectionHandle, ConnectionId, Delivery, DetachedConnection,
    MessagePushError, MessagePusher, Participant, PresenceScope, RoomId, RoomRegistry,
    ServerEvent,
};

#[derive(Debug, Default)]
struct HubState {
    registry: RoomRegistry,
    presence: CallPresence,
}

impl HubState {
    fn fan_out(&self, room_id: &RoomId, event: ServerEvent) -> BroadcastReport {
        let kind = event.kind();
        let event = Arc::new(event);

        let mut report = BroadcastReport::default();
        for target in self.registry.connections(room_id) {
            match target.deliver(Arc::clone(&event)) {
                Delivery::Queued => report.delivered += 1,
                Delivery::Evicted => report.evicted += 1,
                Delivery::Closed => {
                    tracing::debug!(
                        connection_id = %target.id,
                        "Skipping closed connection"
                    );
                }
            }
        }

        tracing::debug!(
            %room_id,
            kind,
            delivered = report.delivered,
            evicted = report.evicted,
            "Broadcast finished"
        );
        report
    }

    fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: ServerEvent,
    ) -> Result<(), MessagePushError> {
        let target = self
            .registry
            .connection(connection_id)
            .ok_or(MessagePushError::ConnectionNotFound(*connection_id))?;

        match target.deliver(Arc::new(event)) {
            Delivery::Queued => Ok(()),
            Delivery::Evicted => Err(MessagePushError::Evicted(*connection_id)),
            Delivery::Closed => Err(MessagePushError::Closed(*connection_id)),
        }
    }
}

/// In-memory hub shared by every connection
///
/// ## 使用例
///
/// ```ignore
/// let hub = Arc::new(ConnectionHub::new());
/// hub.attach(handle).await;
/// hub.broadcast(&room_id, ServerEvent::Participants(vec![])).await;
/// ```
#[derive(Debug, Default)]
pub struct ConnectionHub {
    state: Mutex<HubState>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live connections attached to `room_id`
    pub async fn connection_count(&self, room_id: &RoomId) -> usize {
        self.state.lock().await.registry.connection_count(room_id)
    }

    /// Number of rooms with at least one live connection
    pub async fn room_count(&self) -> usize {
        self.state.lock().await.registry.room_count()
    }

    /// Call-presence reference count for a user
    pub async fn call_count(&self, room_id: &RoomId, user_id: &crate::domain::UserId) -> usize {
        self.state.lock().await.presence.count(room_id, user_id)
    }
}

#[async_trait]
impl MessagePusher for ConnectionHub {
    async fn attach(&self, connection: ConnectionHandle) -> bool {
        let connection_id = connection.id;
        let room_id = connection.room_id;
        let attached = self.state.lock().await.registry.attach(connection);
        if attached {
            tracing::debug!(%connection_id, %room_id, "Connection attached");
        }
        attached
    }

    async fn detach(&self, connection_id: &ConnectionId) -> Option<DetachedConnection> {
        let detached = {
            let mut state = self.state.lock().await;
            let detached = state.registry.detach(connection_id)?;
            if detached.was_in_call {
                let handle = &detached.handle;
                state
                    .presence
                    .mark_out_of_call(&handle.room_id, &handle.participant.user_id);
            }
            detached
        };
        tracing::debug!(
            %connection_id,
            room_id = %detached.handle.room_id,
            was_in_call = detached.was_in_call,
            "Connection detached"
        );
        Some(detached)
    }

    async fn set_in_call(&self, connection_id: &ConnectionId, in_call: bool) -> bool {
        let mut state = self.state.lock().await;
        let Some((room_id, participant)) = state.registry.set_in_call(connection_id, in_call)
        else {
            return false;
        };
        let count = if in_call {
            state.presence.mark_in_call(room_id, participant.clone())
        } else {
            state.presence.mark_out_of_call(&room_id, &participant.user_id)
        };
        tracing::debug!(
            %connection_id,
            %room_id,
            user_id = %participant.user_id,
            in_call,
            count,
            "Call presence updated"
        );
        true
    }

    async fn broadcast(&self, room_id: &RoomId, event: ServerEvent) -> BroadcastReport {
        self.state.lock().await.fan_out(room_id, event)
    }

    async fn broadcast_presence(&self, room_id: &RoomId, scope: PresenceScope) -> BroadcastReport {
        let state = self.state.lock().await;
        let mut report = BroadcastReport::default();
        if scope == PresenceScope::Room {
            let participants = state.registry.participants(room_id);
            report = state.fan_out(room_id, ServerEvent::Participants(participants));
        }
        let call_users = state.presence.snapshot(room_id);
        let call_report = state.fan_out(room_id, ServerEvent::CallParticipants(call_users));
        report.delivered += call_report.delivered;
        report.evicted += call_report.evicted;
        report
    }

    async fn push_call_participants(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<(), MessagePushError> {
        let state = self.state.lock().await;
        let room_id = state
            .registry
            .connection(connection_id)
            .map(|handle| handle.room_id)
            .ok_or(MessagePushError::ConnectionNotFound(*connection_id))?;
        let call_users = state.presence.snapshot(&room_id);
        state.push_to(connection_id, ServerEvent::CallParticipants(call_users))
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: ServerEvent,
    ) -> Result<(), MessagePushError> {
        self.state.lock().await.push_to(connection_id, event)
    }

    async fn participants(&self, room_id: &RoomId) -> Vec<Participant> {
        self.state.lock().await.registry.participants(room_id)
    }

    async fn call_participants(&self, room_id: &RoomId) -> Vec<Participant> {
        self.state.lock().await.presence.snapshot(room_id)
    }
}
