//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{IdentityError, RoomId, StoreError, UserId, ValueObjectError};

/// ルームへのアクセス（WebSocket 接続・プレゼンス照会）の拒否理由
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] IdentityError),

    #[error("room '{0}' not found")]
    RoomNotFound(RoomId),

    #[error("user '{user_id}' is not a member of room '{room_id}'")]
    Forbidden { room_id: RoomId, user_id: UserId },

    #[error("store lookup failed: {0}")]
    Store(#[from] StoreError),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("message content must not be empty")]
    EmptyContent,

    #[error("failed to persist message: {0}")]
    Persist(#[from] StoreError),
}

impl From<ValueObjectError> for SendMessageError {
    fn from(_: ValueObjectError) -> Self {
        SendMessageError::EmptyContent
    }
}
