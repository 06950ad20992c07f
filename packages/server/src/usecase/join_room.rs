//! UseCase: ルームへの参加（セッションのブートストラップ）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 参加直後に、ルーム全体と新しいコネクションへ正しい順序でスナップショットが届く必要がある
//! - 履歴の取得に失敗しても接続は維持される
//!
//! ### どのような状況を想定しているか
//! - 正常系：既存メンバーが居るルームへの参加
//! - 異常系：履歴取得の失敗

use std::sync::Arc;

use crate::domain::{
    ConnectionHandle, ConnectionId, MessagePushError, MessagePusher, PresenceScope, RoomStore,
    ServerEvent,
};

/// Frames queued for a new connection before its write loop starts
///
/// participants, call_participants, history, call_participants
pub const BOOTSTRAP_FRAMES: usize = 4;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    store: Arc<dyn RoomStore>,
    message_pusher: Arc<dyn MessagePusher>,
    history_limit: usize,
}

impl JoinRoomUseCase {
    pub fn new(
        store: Arc<dyn RoomStore>,
        message_pusher: Arc<dyn MessagePusher>,
        history_limit: usize,
    ) -> Self {
        Self {
            store,
            message_pusher,
            history_limit,
        }
    }

    /// コネクションを登録し、スナップショットを送信する
    ///
    /// 送信順序:
    /// 1. ルーム全体へ participants
    /// 2. ルーム全体へ call_participants
    /// 3. 新しいコネクションへ history（取得できた場合のみ）
    /// 4. 新しいコネクションへ call_participants
    ///
    /// # Returns
    ///
    /// 登録できた場合は `true`（同じコネクションの二重登録は `false`）
    pub async fn execute(&self, connection: ConnectionHandle) -> bool {
        let connection_id = connection.id;
        let room_id = connection.room_id;
        let user_id = connection.participant.user_id;

        if !self.message_pusher.attach(connection).await {
            tracing::warn!(%connection_id, %room_id, "Connection already attached");
            return false;
        }

        self.message_pusher
            .broadcast_presence(&room_id, PresenceScope::Room)
            .await;

        match self
            .store
            .list_recent_messages(&room_id, self.history_limit)
            .await
        {
            Ok(messages) => {
                let result = self
                    .message_pusher
                    .push_to(&connection_id, ServerEvent::History(messages))
                    .await;
                log_push_failure(&connection_id, "history", result);
            }
            Err(e) => {
                tracing::warn!(%connection_id, %room_id, "Failed to load history: {}", e);
            }
        }

        let result = self
            .message_pusher
            .push_call_participants(&connection_id)
            .await;
        log_push_failure(&connection_id, "call_participants", result);

        tracing::info!(%connection_id, %room_id, %user_id, "Joined room");
        true
    }
}

fn log_push_failure(
    connection_id: &ConnectionId,
    kind: &'static str,
    result: Result<(), MessagePushError>,
) {
    if let Err(e) = result {
        tracing::warn!(%connection_id, kind, "Failed to push bootstrap snapshot: {}", e);
    }
}
