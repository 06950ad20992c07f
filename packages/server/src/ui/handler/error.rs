//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    domain::{IdentityError, StoreError},
    infrastructure::dto::http::ErrorDto,
    usecase::AccessError,
};

/// Rejection returned by the HTTP API and the upgrade endpoint
///
/// Rendered as `{"error": "<reason>"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl ApiError {
    pub const fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    pub const fn invalid_room_id() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid room id")
    }
}

impl From<AccessError> for ApiError {
    fn from(error: AccessError) -> Self {
        match &error {
            AccessError::Unauthorized(IdentityError::MissingToken) => {
                Self::new(StatusCode::UNAUTHORIZED, "missing token")
            }
            AccessError::Unauthorized(IdentityError::InvalidPayload(_)) => {
                Self::new(StatusCode::UNAUTHORIZED, "invalid token payload")
            }
            AccessError::Unauthorized(_) => Self::new(StatusCode::UNAUTHORIZED, "invalid token"),
            AccessError::RoomNotFound(_) => Self::new(StatusCode::NOT_FOUND, "room not found"),
            AccessError::Forbidden { .. } => Self::new(StatusCode::FORBIDDEN, "forbidden"),
            AccessError::Store(_) => {
                tracing::error!("Access check failed: {}", error);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "failed to check membership")
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::RoomNotFound(_) => Self::new(StatusCode::NOT_FOUND, "room not found"),
            other => {
                tracing::error!("Store lookup failed: {}", other);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorDto {
            error: self.message.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}
