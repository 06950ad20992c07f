//! メッセージ送信（通知）の実装
//!
//! ## 概要
//!
//! このモジュールは `MessagePusher` trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `hub`: プロセス内メモリ上のルームレジストリ + 通話プレゼンス

pub mod hub;

pub use hub::ConnectionHub;
