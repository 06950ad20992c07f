//! UI layer: axum router, handlers and the per-connection pump.

mod cors;
mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
pub use state::AppState;
