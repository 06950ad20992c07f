//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::{
    cors::cors_layer,
    handler::{get_call_participants, get_room_presence, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Real-time room hub server
///
/// # Example
///
/// ```ignore
/// let state = AppState::new(store, verifier, hub, HubConfig::default());
/// Server::new(state)
///     .with_allowed_origins(vec!["http://localhost:5173".to_string()])
///     .run("127.0.0.1".to_string(), 8080)
///     .await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    allowed_origins: Vec<String>,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
            allowed_origins: Vec::new(),
        }
    }

    /// CORS origins for the HTTP API (`*` allows any)
    pub fn with_allowed_origins(mut self, allowed_origins: Vec<String>) -> Self {
        self.allowed_origins = allowed_origins;
        self
    }

    /// Build the router without binding a listener
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws/rooms/{room_id}", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms/{room_id}/presence", get(get_room_presence))
            .route(
                "/api/rooms/{room_id}/call-participants",
                get(get_call_participants),
            )
            .layer(cors_layer(&self.allowed_origins))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Parlor hub listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws/rooms/{{room_id}}?token=...", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
