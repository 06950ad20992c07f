//! Shared application state.

use std::sync::Arc;

use crate::{
    config::HubConfig,
    domain::{IdentityVerifier, MessagePusher, RoomStore},
    usecase::{
        AuthorizeUseCase, CallPresenceUseCase, GetRoomPresenceUseCase, JoinRoomUseCase,
        LeaveRoomUseCase, SendMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// AuthorizeUseCase（トークン検証とメンバー確認）
    pub authorize_usecase: Arc<AuthorizeUseCase>,
    /// JoinRoomUseCase（登録とスナップショット送信）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// LeaveRoomUseCase（登録解除と後始末）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// SendMessageUseCase（永続化とブロードキャスト）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// CallPresenceUseCase（通話への参加・離脱）
    pub call_presence_usecase: Arc<CallPresenceUseCase>,
    /// GetRoomPresenceUseCase（プレゼンス照会）
    pub get_room_presence_usecase: Arc<GetRoomPresenceUseCase>,
    /// コネクションごとの設定値
    pub hub_config: HubConfig,
}

impl AppState {
    /// Wire every use case against the same store, verifier and hub
    pub fn new(
        store: Arc<dyn RoomStore>,
        verifier: Arc<dyn IdentityVerifier>,
        message_pusher: Arc<dyn MessagePusher>,
        hub_config: HubConfig,
    ) -> Self {
        Self {
            authorize_usecase: Arc::new(AuthorizeUseCase::new(store.clone(), verifier)),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                store.clone(),
                message_pusher.clone(),
                hub_config.history_limit,
            )),
            leave_room_usecase: Arc::new(LeaveRoomUseCase::new(message_pusher.clone())),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                store.clone(),
                message_pusher.clone(),
            )),
            call_presence_usecase: Arc::new(CallPresenceUseCase::new(message_pusher.clone())),
            get_room_presence_usecase: Arc::new(GetRoomPresenceUseCase::new(
                store,
                message_pusher,
            )),
            hub_config,
        }
    }
}
