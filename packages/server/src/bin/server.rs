//! Parlor real-time room hub server.
//!
//! Run with:
//! ```not_rust
//! PARLOR_JWT_SECRET=... cargo run --bin parlor-server -- --seed seed.json
//! cargo run --bin parlor-server -- --host 0.0.0.0 --port 3000 --jwt-secret ...
//! ```

use std::sync::Arc;

use clap::Parser;
use parlor_server::{
    config::ServerArgs,
    infrastructure::{
        identity::JwtIdentityVerifier,
        message_pusher::ConnectionHub,
        repository::{InMemoryRoomStore, SeedData},
    },
    ui::{AppState, Server},
};
use parlor_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = ServerArgs::parse();

    // Initialize tracing
    setup_logger(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_BIN_NAME"),
        &args.log_level,
    );

    let hub_config = match args.hub_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize dependencies in order:
    // 1. Store
    // 2. IdentityVerifier
    // 3. MessagePusher (hub)
    // 4. AppState (UseCases)
    // 5. Server

    // 1. Create Store (in-memory, optionally seeded)
    let seed = match &args.seed {
        Some(path) => match SeedData::from_file(path) {
            Ok(seed) => seed,
            Err(e) => {
                tracing::error!("Failed to load seed data: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("No seed file given, starting with an empty room store");
            SeedData::default()
        }
    };
    let store = Arc::new(InMemoryRoomStore::from_seed(seed));

    // 2. Create IdentityVerifier (HS256 JWT)
    let verifier = match JwtIdentityVerifier::new(&args.jwt_secret) {
        Ok(verifier) => Arc::new(verifier),
        Err(e) => {
            tracing::error!("Invalid JWT secret: {}", e);
            std::process::exit(1);
        }
    };

    // 3. Create MessagePusher (connection hub)
    let hub = Arc::new(ConnectionHub::new());

    // 4. Create UseCases
    let state = AppState::new(store, verifier, hub, hub_config);
    tracing::info!(
        idle_timeout = ?hub_config.idle_timeout,
        ping_interval = ?hub_config.ping_interval,
        outbound_capacity = hub_config.outbound_capacity,
        history_limit = hub_config.history_limit,
        "Hub configured"
    );

    // 5. Create and run the server
    let server = Server::new(state).with_allowed_origins(args.allowed_origins);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
