//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() / announce() メソッド
//!
//! ### なぜこのテストが必要か
//! - 永続化が成功したメッセージだけがルーム全体（送信者を含む）に届く
//! - 空のメッセージは永続化もブロードキャストもされない
//! - 永続化に失敗した場合はブロードキャストしない（リトライもしない）
//!
//! ### どのような状況を想定しているか
//! - 正常系：テキストメッセージ、永続化済みの画像メッセージの通知
//! - 異常系：空のメッセージ、永続化の失敗

use std::sync::Arc;

use crate::domain::{
    BroadcastReport, MessageContent, MessageDraft, MessagePusher, RoomId, RoomStore, ServerEvent,
    StoredMessage, UserId,
};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Store（永続化の抽象化）
    store: Arc<dyn RoomStore>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendMessageUseCase {
    pub fn new(store: Arc<dyn RoomStore>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            store,
            message_pusher,
        }
    }

    /// チャットメッセージを永続化し、ルーム全体にブロードキャストする
    ///
    /// # Arguments
    ///
    /// * `room_id` - 送信先ルーム
    /// * `user_id` - 送信者
    /// * `content` - クライアントから受け取った本文（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(StoredMessage)` - 採番済みのメッセージ
    /// * `Err(SendMessageError)` - 空のメッセージ、または永続化の失敗
    pub async fn execute(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        content: String,
    ) -> Result<StoredMessage, SendMessageError> {
        let content = MessageContent::new(content)?;
        self.persist_and_announce(room_id, user_id, MessageDraft::text(content))
            .await
    }

    /// 永続化済みのメッセージをブロードキャストする
    ///
    /// 画像アップロードのように、呼び出し側が `RoomStore` に直接保存した
    /// メッセージをルームへ通知するときに使う。
    pub async fn announce(&self, message: StoredMessage) -> BroadcastReport {
        let room_id = message.room_id;
        self.message_pusher
            .broadcast(&room_id, ServerEvent::Chat(message))
            .await
    }

    async fn persist_and_announce(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        draft: MessageDraft,
    ) -> Result<StoredMessage, SendMessageError> {
        let message = self.store.persist_message(room_id, user_id, draft).await?;
        tracing::debug!(
            %room_id,
            %user_id,
            message_id = message.id,
            kind = message.kind.as_str(),
            "Message persisted"
        );
        self.announce(message.clone()).await;
        Ok(message)
    }
}
