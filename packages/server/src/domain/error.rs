//! Domain errors

use thiserror::Error;

use super::value_object::ConnectionId;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("invalid room id: '{0}'")]
    InvalidRoomId(String),

    #[error("invalid user id: '{0}'")]
    InvalidUserId(String),

    #[error("message content must not be empty")]
    EmptyMessageContent,
}

/// Errors reported by the collaborator store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Identity token verification errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("missing identity token")]
    MissingToken,

    #[error("invalid identity token: {0}")]
    InvalidToken(String),

    #[error("invalid identity token payload: {0}")]
    InvalidPayload(String),

    #[error("failed to issue identity token: {0}")]
    Issue(String),
}

/// Errors while pushing an event to a single connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' not attached")]
    ConnectionNotFound(ConnectionId),

    #[error("connection '{0}' evicted: outbound queue full")]
    Evicted(ConnectionId),

    #[error("connection '{0}' already closed")]
    Closed(ConnectionId),
}
