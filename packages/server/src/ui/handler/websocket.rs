//! WebSocket upgrade endpoint and connection lifecycle.

use std::sync::Arc;

use axum::{
    extract::{
        Path, Query, State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::stream::StreamExt;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{ConnectionHandle, ConnectionLifecycle, ConnectionState, Identity, RoomId, pusher_channel},
    ui::state::AppState,
};

use super::{
    access::authorize_request,
    error::ApiError,
    pump::{DisconnectReason, ReadContext, WriteSettings, read_loop, write_loop},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

/// `GET /ws/rooms/{room_id}?token=...`
///
/// Every check runs before the upgrade; a rejected caller gets a plain HTTP
/// error and never a socket.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> Result<Response, ApiError> {
    let (identity, room_id) =
        match authorize_request(&state, query.token.as_deref(), &room_id).await {
            Ok(authorized) => authorized,
            Err(e) => {
                tracing::warn!(room_id = %room_id, status = %e.status, "Rejecting upgrade: {}", e.message);
                return Err(e);
            }
        };

    let max_frame_bytes = state.hub_config.max_frame_bytes;
    Ok(ws
        .max_message_size(max_frame_bytes)
        .max_frame_size(max_frame_bytes)
        .on_upgrade(move |socket| handle_socket(socket, state, room_id, identity)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, room_id: RoomId, identity: Identity) {
    let config = state.hub_config;
    let (tx, rx) = pusher_channel(config.outbound_capacity);
    let closer = CancellationToken::new();
    let handle = ConnectionHandle::new(room_id, identity.participant(), tx, closer.clone());
    let connection_id = handle.id;
    let user_id = identity.user_id;
    let mut lifecycle = ConnectionLifecycle::new(connection_id);

    tracing::info!(
        %connection_id,
        %room_id,
        %user_id,
        username = %identity.display_name,
        "Client connected"
    );

    if !state.join_room_usecase.execute(handle).await {
        lifecycle.advance(ConnectionState::Draining);
        lifecycle.advance(ConnectionState::Closed);
        return;
    }
    lifecycle.advance(ConnectionState::Active);

    let (sender, receiver) = socket.split();

    // Spawn a task to push queued events (and pings) to this client
    let send_task = tokio::spawn(write_loop(
        sender,
        rx,
        closer.clone(),
        WriteSettings {
            ping_interval: config.ping_interval,
            write_timeout: config.write_timeout,
        },
    ));

    // Spawn a task to receive frames from this client
    let recv_task = tokio::spawn(read_loop(
        receiver,
        ReadContext {
            state: state.clone(),
            connection_id,
            room_id,
            user_id,
            closer: closer.clone(),
            idle_timeout: config.idle_timeout,
        },
    ));

    // 読み込みループが終わったら後始末（書き込み側の失敗は close signal 経由で伝わる）
    let read_reason = recv_task.await.unwrap_or_else(|e| {
        tracing::error!(%connection_id, "Read loop panicked: {}", e);
        DisconnectReason::ReadError(e.to_string())
    });
    lifecycle.advance(ConnectionState::Draining);

    state.leave_room_usecase.execute(&connection_id).await;
    closer.cancel();

    let write_reason = send_task.await.unwrap_or_else(|e| {
        tracing::error!(%connection_id, "Write loop panicked: {}", e);
        DisconnectReason::WriteError(e.to_string())
    });
    lifecycle.advance(ConnectionState::Closed);

    tracing::info!(
        %connection_id,
        %room_id,
        %user_id,
        read = %read_reason,
        write = %write_reason,
        "Client disconnected"
    );
}
