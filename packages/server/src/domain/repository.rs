//! Collaborator trait 定義
//!
//! ハブが外部（CRUD 層のストアや認証基盤）に求めるインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 依存性の逆転（DIP）
//!
//! - ドメイン層が必要とするインターフェースをドメイン層自身が定義
//! - Infrastructure 層がドメイン層のインターフェースに依存
//! - ドメイン層は Infrastructure 層に依存しない

use async_trait::async_trait;

use super::{
    IdentityError, StoreError,
    entity::{Identity, MessageDraft, Participant, StoredMessage},
    value_object::{RoomId, UserId},
};

/// Room store collaborator
///
/// ルームの存在確認・メンバー確認・メッセージの永続化を担う。
/// 永続化の一貫性はストア側が保証し、ハブはリトライしない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// ルームが存在するか
    async fn room_exists(&self, room_id: &RoomId) -> Result<bool, StoreError>;

    /// ユーザーがルームのメンバーか
    async fn is_member(&self, room_id: &RoomId, user_id: &UserId) -> Result<bool, StoreError>;

    /// ルームのメンバー一覧（表示名順）
    async fn list_members(&self, room_id: &RoomId) -> Result<Vec<Participant>, StoreError>;

    /// メッセージを永続化し、採番済みのメッセージを返す
    async fn persist_message(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        draft: MessageDraft,
    ) -> Result<StoredMessage, StoreError>;

    /// 直近 `limit` 件のメッセージ（古い順）
    async fn list_recent_messages(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, StoreError>;
}

/// Identity token verification collaborator
#[cfg_attr(test, mockall::automock)]
pub trait IdentityVerifier: Send + Sync {
    /// Resolve the caller behind an opaque identity token
    fn verify(&self, token: &str) -> Result<Identity, IdentityError>;
}
