//! Room Registry
//!
//! ルーム ID → 接続中コネクションの集合。
//!
//! ## 不変条件
//!
//! - 1 つのコネクションは同時に高々 1 つのルームにしか属さない
//! - コネクションが 0 になったルームのエントリは即座に削除する
//!
//! ロックは持たない。排他制御は呼び出し側（`ConnectionHub`）が
//! Call Presence Tracker と共通の 1 つのロックで行う。

use std::collections::HashMap;

use super::{
    connection::ConnectionHandle,
    entity::{Participant, sort_participants},
    value_object::{ConnectionId, RoomId, UserId},
};

#[derive(Debug)]
struct RegisteredConnection {
    handle: ConnectionHandle,
    in_call: bool,
}

/// A connection removed from the registry
#[derive(Debug)]
pub struct DetachedConnection {
    pub handle: ConnectionHandle,
    /// Whether the connection still counted towards call presence
    pub was_in_call: bool,
}

#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, HashMap<ConnectionId, RegisteredConnection>>,
    /// Reverse index: which room each connection is attached to
    locations: HashMap<ConnectionId, RoomId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a connection into its room. Returns `false` if it was already attached.
    pub fn attach(&mut self, handle: ConnectionHandle) -> bool {
        if self.locations.contains_key(&handle.id) {
            return false;
        }
        self.locations.insert(handle.id, handle.room_id);
        self.rooms.entry(handle.room_id).or_default().insert(
            handle.id,
            RegisteredConnection {
                handle,
                in_call: false,
            },
        );
        true
    }

    /// Remove a connection, pruning its room if it was the last one.
    ///
    /// Returns `None` when the connection is not attached, so a second call is a no-op.
    pub fn detach(&mut self, connection_id: &ConnectionId) -> Option<DetachedConnection> {
        let room_id = self.locations.remove(connection_id)?;
        let connections = self.rooms.get_mut(&room_id)?;
        let removed = connections.remove(connection_id);
        if connections.is_empty() {
            self.rooms.remove(&room_id);
        }
        removed.map(|entry| DetachedConnection {
            handle: entry.handle,
            was_in_call: entry.in_call,
        })
    }

    /// Flip the connection's in-call flag.
    ///
    /// Returns the connection's room and participant only when the flag actually
    /// changed; repeated joins or leaves from the same connection return `None`.
    pub fn set_in_call(
        &mut self,
        connection_id: &ConnectionId,
        in_call: bool,
    ) -> Option<(RoomId, Participant)> {
        let room_id = self.locations.get(connection_id)?;
        let entry = self.rooms.get_mut(room_id)?.get_mut(connection_id)?;
        if entry.in_call == in_call {
            return None;
        }
        entry.in_call = in_call;
        Some((entry.handle.room_id, entry.handle.participant.clone()))
    }

    /// Point-in-time copy of the handles attached to `room_id`
    pub fn connections(&self, room_id: &RoomId) -> Vec<ConnectionHandle> {
        self.rooms
            .get(room_id)
            .map(|connections| {
                connections
                    .values()
                    .map(|entry| entry.handle.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn connection(&self, connection_id: &ConnectionId) -> Option<ConnectionHandle> {
        let room_id = self.locations.get(connection_id)?;
        self.rooms
            .get(room_id)?
            .get(connection_id)
            .map(|entry| entry.handle.clone())
    }

    /// Connected users of a room, one entry per user
    pub fn participants(&self, room_id: &RoomId) -> Vec<Participant> {
        let Some(connections) = self.rooms.get(room_id) else {
            return Vec::new();
        };
        let unique: HashMap<UserId, Participant> = connections
            .values()
            .map(|entry| {
                let participant = entry.handle.participant.clone();
                (participant.user_id, participant)
            })
            .collect();
        let mut participants: Vec<Participant> = unique.into_values().collect();
        sort_participants(&mut participants);
        participants
    }

    pub fn connection_count(&self, room_id: &RoomId) -> usize {
        self.rooms.get(room_id).map_or(0, HashMap::len)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
