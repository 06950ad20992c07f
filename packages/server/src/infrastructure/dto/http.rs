//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::ParticipantDto;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}

/// `GET /api/rooms/{room_id}/presence`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPresenceDto {
    pub room_id: String,
    pub members: Vec<ParticipantDto>,
    pub participants: Vec<ParticipantDto>,
    pub call_users: Vec<ParticipantDto>,
}

/// `GET /api/rooms/{room_id}/call-participants`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallParticipantsDto {
    pub room_id: String,
    pub call_users: Vec<ParticipantDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}
