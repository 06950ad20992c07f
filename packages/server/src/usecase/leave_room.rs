//! UseCase: ルームからの離脱（コネクションの後始末）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 正常切断・異常切断・キュー満杯による切断のすべてがこの経路を通る
//! - 二重に呼ばれても通話カウントやスナップショットの送信が重複してはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：通話中のコネクションの離脱
//! - エッジケース：二重の離脱、最後のコネクションの離脱

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PresenceScope};

/// ルーム離脱のユースケース
pub struct LeaveRoomUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// コネクションを登録解除し、残りのメンバーへスナップショットを送る
    ///
    /// # Returns
    ///
    /// 今回の呼び出しで登録解除した場合は `true`（二度目以降は `false`）
    pub async fn execute(&self, connection_id: &ConnectionId) -> bool {
        let Some(detached) = self.message_pusher.detach(connection_id).await else {
            return false;
        };
        let room_id = detached.handle.room_id;

        self.message_pusher
            .broadcast_presence(&room_id, PresenceScope::Room)
            .await;

        tracing::info!(
            %connection_id,
            %room_id,
            user_id = %detached.handle.participant.user_id,
            was_in_call = detached.was_in_call,
            "Left room"
        );
        true
    }
}
