//! InMemory 実装

pub mod room;
pub mod seed;

pub use room::InMemoryRoomStore;
pub use seed::{SeedData, SeedError, SeedMember, SeedRoom};
