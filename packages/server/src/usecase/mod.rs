//! UseCase layer
//!
//! ハブの操作ごとに 1 つのユースケース。
//! 依存はドメイン層の trait（`RoomStore` / `IdentityVerifier` / `MessagePusher`）のみ。

pub mod authorize;
pub mod call_presence;
pub mod error;
pub mod get_room_presence;
pub mod join_room;
pub mod leave_room;
pub mod send_message;

pub use authorize::AuthorizeUseCase;
pub use call_presence::CallPresenceUseCase;
pub use error::{AccessError, SendMessageError};
pub use get_room_presence::{GetRoomPresenceUseCase, RoomPresence};
pub use join_room::{BOOTSTRAP_FRAMES, JoinRoomUseCase};
pub use leave_room::LeaveRoomUseCase;
pub use send_message::SendMessageUseCase;
