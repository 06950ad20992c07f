//! InMemory RoomStore 実装
//!
//! ドメイン層が定義する RoomStore trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! メッセージの採番はストア全体で単調増加するため、ルーム単位でも単調増加になる。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use parlor_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::domain::{
    MessageDraft, Participant, RoomId, RoomStore, StoreError, StoredMessage, UserId,
    entity::sort_participants,
};

use super::seed::SeedData;

/// History page size used when the requested limit is out of range
const DEFAULT_HISTORY_LIMIT: usize = 50;
const MAX_HISTORY_LIMIT: usize = 200;

#[derive(Debug)]
struct StoredRoom {
    members: HashMap<UserId, String>,
    messages: Vec<StoredMessage>,
}

#[derive(Debug, Default)]
struct StoreState {
    rooms: HashMap<RoomId, StoredRoom>,
    last_message_id: i64,
}

/// インメモリ RoomStore 実装
pub struct InMemoryRoomStore {
    state: Mutex<StoreState>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            clock,
        }
    }

    /// Build a store pre-populated with `seed`, stamped by the system clock
    pub fn from_seed(seed: SeedData) -> Self {
        Self::from_seed_with_clock(seed, Arc::new(SystemClock))
    }

    pub fn from_seed_with_clock(seed: SeedData, clock: Arc<dyn Clock>) -> Self {
        let mut state = StoreState::default();
        for room in seed.rooms {
            let members = room
                .members
                .into_iter()
                .map(|member| (UserId::new(member.id), member.username))
                .collect();
            let room_id = RoomId::new(room.id);
            tracing::debug!(%room_id, name = %room.name, "Loading seeded room");
            state.rooms.insert(
                room_id,
                StoredRoom {
                    members,
                    messages: Vec::new(),
                },
            );
        }
        tracing::info!(rooms = state.rooms.len(), "Seeded in-memory room store");

        Self {
            state: Mutex::new(state),
            clock,
        }
    }

    /// Create an empty room. Returns `false` if the id is already taken.
    ///
    /// Room names live with the CRUD layer; the name is only logged here.
    pub async fn create_room(&self, room_id: RoomId, name: &str) -> bool {
        let mut state = self.state.lock().await;
        if state.rooms.contains_key(&room_id) {
            return false;
        }
        state.rooms.insert(
            room_id,
            StoredRoom {
                members: HashMap::new(),
                messages: Vec::new(),
            },
        );
        tracing::debug!(%room_id, name, "Room created");
        true
    }

    /// Add (or rename) a room member
    pub async fn add_member(
        &self,
        room_id: &RoomId,
        user_id: UserId,
        username: impl Into<String>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let room = state
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| StoreError::RoomNotFound(room_id.to_string()))?;
        room.members.insert(user_id, username.into());
        Ok(())
    }
}

fn clamp_history_limit(limit: usize) -> usize {
    if limit == 0 || limit > MAX_HISTORY_LIMIT {
        DEFAULT_HISTORY_LIMIT
    } else {
        limit
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn room_exists(&self, room_id: &RoomId) -> Result<bool, StoreError> {
        let state = self.state.lock().await;
        Ok(state.rooms.contains_key(room_id))
    }

    async fn is_member(&self, room_id: &RoomId, user_id: &UserId) -> Result<bool, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .rooms
            .get(room_id)
            .is_some_and(|room| room.members.contains_key(user_id)))
    }

    async fn list_members(&self, room_id: &RoomId) -> Result<Vec<Participant>, StoreError> {
        let state = self.state.lock().await;
        let room = state
            .rooms
            .get(room_id)
            .ok_or_else(|| StoreError::RoomNotFound(room_id.to_string()))?;

        let mut members: Vec<Participant> = room
            .members
            .iter()
            .map(|(user_id, username)| Participant::new(*user_id, username.clone()))
            .collect();
        sort_participants(&mut members);
        Ok(members)
    }

    async fn persist_message(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        draft: MessageDraft,
    ) -> Result<StoredMessage, StoreError> {
        let created_at = self.clock.now();
        let mut state = self.state.lock().await;
        let next_id = state.last_message_id + 1;

        let room = state
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| StoreError::RoomNotFound(room_id.to_string()))?;
        let username = room
            .members
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;

        let message = StoredMessage {
            id: next_id,
            room_id: *room_id,
            user_id: *user_id,
            username,
            content: draft.content,
            kind: draft.kind,
            media_url: draft.media_url,
            created_at,
        };
        room.messages.push(message.clone());
        state.last_message_id = next_id;

        Ok(message)
    }

    async fn list_recent_messages(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, StoreError> {
        let limit = clamp_history_limit(limit);
        let state = self.state.lock().await;
        let room = state
            .rooms
            .get(room_id)
            .ok_or_else(|| StoreError::RoomNotFound(room_id.to_string()))?;

        let start = room.messages.len().saturating_sub(limit);
        Ok(room.messages[start..].to_vec())
    }
}
