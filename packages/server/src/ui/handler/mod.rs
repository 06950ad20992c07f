//! HTTP and WebSocket handlers.

mod access;
mod error;
mod http;
mod pump;
mod websocket;

pub use http::{get_call_participants, get_room_presence, health_check};
pub use websocket::websocket_handler;
