//! MessagePusher trait 定義
//!
//! コネクションの登録・解除と、ルーム単位のファンアウトを抽象化する。
//! Room Registry と Call Presence Tracker は同じ排他領域で守られるため、
//! 通話状態の変更もこの trait を通して行う。

use async_trait::async_trait;

use super::{
    MessagePushError,
    connection::ConnectionHandle,
    entity::Participant,
    event::ServerEvent,
    registry::DetachedConnection,
    value_object::{ConnectionId, RoomId},
};

/// Outcome of one broadcast call
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Recipients whose queue accepted the event
    pub delivered: usize,
    /// Recipients closed because their queue was full
    pub evicted: usize,
}

/// Snapshots fanned out together by [`MessagePusher::broadcast_presence`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceScope {
    /// participants → call_participants
    Room,
    /// call_participants のみ
    Call,
}

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// コネクションをルームに登録（同一コネクションの二重登録は無視）
    async fn attach(&self, connection: ConnectionHandle) -> bool;

    /// コネクションを登録解除し、通話中だった場合は通話カウントも減らす
    ///
    /// 二度目以降の呼び出しは `None` を返し、何もしない。
    async fn detach(&self, connection_id: &ConnectionId) -> Option<DetachedConnection>;

    /// コネクションの通話フラグを変更（変化した場合のみ `true`）
    async fn set_in_call(&self, connection_id: &ConnectionId, in_call: bool) -> bool;

    /// ルームの全コネクションに送信（送信キューが満杯のコネクションは切断）
    async fn broadcast(&self, room_id: &RoomId, event: ServerEvent) -> BroadcastReport;

    /// 現在のスナップショットを取得し、同じ排他区間のままルーム全体へ送信
    ///
    /// 取得と送信の間に他の変更が割り込まないため、最後に届いた
    /// スナップショットが常に最新の状態になる。
    async fn broadcast_presence(&self, room_id: &RoomId, scope: PresenceScope) -> BroadcastReport;

    /// 通話中の参加者スナップショットを 1 つのコネクションにだけ送信
    async fn push_call_participants(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<(), MessagePushError>;

    /// 特定のコネクションにだけ送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// 接続中の参加者スナップショット
    async fn participants(&self, room_id: &RoomId) -> Vec<Participant>;

    /// 通話中の参加者スナップショット
    async fn call_participants(&self, room_id: &RoomId) -> Vec<Participant>;
}
