//! UseCase: ルームのプレゼンス照会
//!
//! ソケットを開かずに「誰がいるか」を答えるための照会。
//! CRUD 層の HTTP エンドポイントから使う。

use std::sync::Arc;

use crate::domain::{MessagePusher, Participant, RoomId, RoomStore, StoreError};

/// ルームのプレゼンス（ある時点のスナップショット）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomPresence {
    pub room_id: RoomId,
    /// ストアに登録されたメンバー
    pub members: Vec<Participant>,
    /// WebSocket で接続中のユーザー
    pub participants: Vec<Participant>,
    /// 通話中のユーザー
    pub call_participants: Vec<Participant>,
}

/// プレゼンス照会のユースケース
pub struct GetRoomPresenceUseCase {
    store: Arc<dyn RoomStore>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl GetRoomPresenceUseCase {
    pub fn new(store: Arc<dyn RoomStore>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            store,
            message_pusher,
        }
    }

    pub async fn execute(&self, room_id: &RoomId) -> Result<RoomPresence, StoreError> {
        let members = self.store.list_members(room_id).await?;
        let participants = self.message_pusher.participants(room_id).await;
        let call_participants = self.message_pusher.call_participants(room_id).await;

        Ok(RoomPresence {
            room_id: *room_id,
            members,
            participants,
            call_participants,
        })
    }

    /// 通話中のユーザーだけを返す
    pub async fn call_participants(&self, room_id: &RoomId) -> Vec<Participant> {
        self.message_pusher.call_participants(room_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionHandle, MockRoomStore, UserId, pusher_channel},
        infrastructure::message_pusher::ConnectionHub,
    };
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn test_presence_combines_members_and_live_state() {
        // テスト項目: メンバー一覧・接続中・通話中をまとめて返す
        // given (前提条件):
        let hub = Arc::new(ConnectionHub::new());
        let room_id = RoomId::generate();
        let alice = Participant::new(UserId::generate(), "alice");
        let bob = Participant::new(UserId::generate(), "bob");
        let members = vec![alice.clone(), bob.clone()];
        let mut store = MockRoomStore::new();
        store
            .expect_list_members()
            .returning(move |_| Ok(members.clone()));
        let (tx, _rx) = pusher_channel(4);
        let handle = ConnectionHandle::new(room_id, alice.clone(), tx, CancellationToken::new());
        hub.attach(handle.clone()).await;
        hub.set_in_call(&handle.id, true).await;
        let usecase = GetRoomPresenceUseCase::new(Arc::new(store), hub.clone());

        // when (操作):
        let presence = usecase.execute(&room_id).await.unwrap();

        // then (期待する結果):
        assert_eq!(presence.room_id, room_id);
        assert_eq!(presence.members, vec![alice.clone(), bob]);
        assert_eq!(presence.participants, vec![alice.clone()]);
        assert_eq!(presence.call_participants, vec![alice.clone()]);
        assert_eq!(usecase.call_participants(&room_id).await, vec![alice]);
    }

    #[tokio::test]
    async fn test_presence_of_unknown_room() {
        // テスト項目: 存在しないルームはストアのエラーを返す
        // given (前提条件):
        let room_id = RoomId::generate();
        let mut store = MockRoomStore::new();
        store
            .expect_list_members()
            .returning(|room_id| Err(StoreError::RoomNotFound(room_id.to_string())));
        let usecase = GetRoomPresenceUseCase::new(Arc::new(store), Arc::new(ConnectionHub::new()));

        // when (操作):
        let result = usecase.execute(&room_id).await;

        // then (期待する結果):
        assert_eq!(result, Err(StoreError::RoomNotFound(room_id.to_string())));
    }
}
