//! UseCase: 通話への参加・離脱
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CallPresenceUseCase::join() / leave() メソッド
//!
//! ### なぜこのテストが必要か
//! - 同じユーザーが複数のコネクションを持つ場合の参照カウントを保証する
//! - 状態が変化したときだけ call_participants をブロードキャストする
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加 → 離脱
//! - エッジケース：二重参加、未参加での離脱、同一ユーザーの二つのコネクション

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PresenceScope, RoomId};

/// 通話プレゼンスのユースケース
pub struct CallPresenceUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl CallPresenceUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// `call_join` を処理（既に通話中なら何もしない）
    pub async fn join(&self, connection_id: &ConnectionId, room_id: &RoomId) -> bool {
        self.update(connection_id, room_id, true).await
    }

    /// `call_leave` を処理（通話中でなければ何もしない）
    pub async fn leave(&self, connection_id: &ConnectionId, room_id: &RoomId) -> bool {
        self.update(connection_id, room_id, false).await
    }

    async fn update(&self, connection_id: &ConnectionId, room_id: &RoomId, in_call: bool) -> bool {
        if !self.message_pusher.set_in_call(connection_id, in_call).await {
            tracing::debug!(%connection_id, in_call, "Call state unchanged");
            return false;
        }

        self.message_pusher
            .broadcast_presence(room_id, PresenceScope::Call)
            .await;
        true
    }
}
