//! Infrastructure layer
//!
//! ドメイン層が定義する trait の具体的な実装と、ワイヤーフォーマット（DTO）。

pub mod dto;
pub mod identity;
pub mod message_pusher;
pub mod repository;
