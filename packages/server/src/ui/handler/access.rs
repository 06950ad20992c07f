//! Request authorization shared by the upgrade endpoint and the HTTP API.

use axum::http::{HeaderMap, header};

use crate::{
    domain::{Identity, RoomId},
    ui::state::AppState,
};

use super::error::ApiError;

/// Verify the token, parse the room id, then check existence and membership.
pub async fn authorize_request(
    state: &AppState,
    token: Option<&str>,
    raw_room_id: &str,
) -> Result<(Identity, RoomId), ApiError> {
    let identity = state.authorize_usecase.authenticate(token)?;
    let room_id = RoomId::try_from(raw_room_id).map_err(|_| ApiError::invalid_room_id())?;
    state
        .authorize_usecase
        .authorize(&identity, &room_id)
        .await?;
    Ok((identity, room_id))
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}
