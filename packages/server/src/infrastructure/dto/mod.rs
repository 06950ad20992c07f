//! Data Transfer Objects (DTOs) for the room hub.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket frame DTOs
//! - `http`: HTTP API response DTOs
//! - `conversion`: domain ↔ DTO conversions

pub mod conversion;
pub mod http;
pub mod websocket;
