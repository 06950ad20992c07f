//! RoomStore の実装
//!
//! ## 実装
//!
//! - `inmemory`: HashMap をストレージとして使うインメモリ実装（開発・テスト用）

pub mod inmemory;

pub use inmemory::{InMemoryRoomStore, SeedData, SeedError, SeedMember, SeedRoom};
