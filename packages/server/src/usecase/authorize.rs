//! UseCase: ルームへのアクセス認可
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AuthorizeUseCase::authenticate() / authorize()
//!
//! ### なぜこのテストが必要か
//! - ソケットのアップグレード前に、トークン・ルーム存在・メンバーシップを
//!   この順で検証する必要がある（拒否理由ごとに HTTP ステータスが異なる）
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーが有効なトークンで接続
//! - 異常系：トークンなし・不正トークン・存在しないルーム・非メンバー・ストア障害

use std::sync::Arc;

use crate::domain::{Identity, IdentityError, IdentityVerifier, RoomId, RoomStore};

use super::error::AccessError;

/// ルームへのアクセス認可のユースケース
pub struct AuthorizeUseCase {
    store: Arc<dyn RoomStore>,
    verifier: Arc<dyn IdentityVerifier>,
}

impl AuthorizeUseCase {
    pub fn new(store: Arc<dyn RoomStore>, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { store, verifier }
    }

    /// トークンを検証して呼び出し元を特定する
    pub fn authenticate(&self, token: Option<&str>) -> Result<Identity, AccessError> {
        let token = token
            .filter(|token| !token.is_empty())
            .ok_or(IdentityError::MissingToken)?;
        Ok(self.verifier.verify(token)?)
    }

    /// ルームの存在と、呼び出し元がメンバーであることを確認する
    pub async fn authorize(&self, identity: &Identity, room_id: &RoomId) -> Result<(), AccessError> {
        if !self.store.room_exists(room_id).await? {
            return Err(AccessError::RoomNotFound(*room_id));
        }
        if !self.store.is_member(room_id, &identity.user_id).await? {
            return Err(AccessError::Forbidden {
                room_id: *room_id,
                user_id: identity.user_id,
            });
        }
        Ok(())
    }
}
