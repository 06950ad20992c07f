//! Utilities shared between Parlor packages.

pub mod logger;
pub mod time;
