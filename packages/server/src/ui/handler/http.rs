//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};

use crate::{
    infrastructure::dto::{
        conversion::participant_dtos,
        http::{CallParticipantsDto, HealthDto, RoomPresenceDto},
    },
    ui::state::AppState,
};

use super::{
    access::{authorize_request, bearer_token},
    error::ApiError,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

/// Members, live participants and call participants of a room
pub async fn get_room_presence(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<RoomPresenceDto>, ApiError> {
    let (_, room_id) = authorize_request(&state, bearer_token(&headers), &room_id).await?;
    let presence = state.get_room_presence_usecase.execute(&room_id).await?;

    // Domain Model から DTO への変換
    Ok(Json(RoomPresenceDto {
        room_id: presence.room_id.to_string(),
        members: participant_dtos(&presence.members),
        participants: participant_dtos(&presence.participants),
        call_users: participant_dtos(&presence.call_participants),
    }))
}

/// Users currently in the room's call
pub async fn get_call_participants(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CallParticipantsDto>, ApiError> {
    let (_, room_id) = authorize_request(&state, bearer_token(&headers), &room_id).await?;
    let call_users = state
        .get_room_presence_usecase
        .call_participants(&room_id)
        .await;

    Ok(Json(CallParticipantsDto {
        room_id: room_id.to_string(),
        call_users: participant_dtos(&call_users),
    }))
}
