//! Parlor real-time room hub.
//!
//! Tracks which connections belong to which room, fans chat and presence
//! events out with bounded per-connection queues, and keeps a
//! reference-counted "in call" set per room.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
