//! Domain layer
//!
//! ハブのビジネスルール（ルームへの所属、通話プレゼンスの参照カウント、
//! コネクションの状態遷移）と、外部コラボレーターへのインターフェース。

pub mod call_presence;
pub mod connection;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use call_presence::CallPresence;
pub use connection::{
    ConnectionHandle, ConnectionLifecycle, ConnectionState, Delivery, PusherChannel,
    PusherReceiver, pusher_channel,
};
pub use entity::{Identity, MessageDraft, MessageKind, Participant, StoredMessage};
pub use error::{IdentityError, MessagePushError, StoreError, ValueObjectError};
pub use event::ServerEvent;
pub use message_pusher::{BroadcastReport, MessagePusher, PresenceScope};
pub use registry::{DetachedConnection, RoomRegistry};
pub use repository::{IdentityVerifier, RoomStore};
pub use value_object::{ConnectionId, MessageContent, RoomId, UserId};

#[cfg(test)]
pub use repository::{MockIdentityVerifier, MockRoomStore};
