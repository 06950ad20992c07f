//! Conversion logic between DTOs and domain entities.

use parlor_shared::time::to_rfc3339_millis;

use crate::domain::{Participant, ServerEvent, StoredMessage};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&StoredMessage> for dto::MessagePayload {
    fn from(model: &StoredMessage) -> Self {
        Self {
            id: model.id,
            room_id: model.room_id.to_string(),
            user_id: model.user_id.to_string(),
            username: model.username.clone(),
            content: model.content.clone(),
            message_type: model.kind.as_str().to_string(),
            media_url: model.media_url.clone(),
            created_at: to_rfc3339_millis(&model.created_at),
        }
    }
}

impl From<&Participant> for dto::ParticipantDto {
    fn from(model: &Participant) -> Self {
        Self {
            id: model.user_id.to_string(),
            username: model.display_name.clone(),
        }
    }
}

/// Convert a participant snapshot, preserving order
pub fn participant_dtos(participants: &[Participant]) -> Vec<dto::ParticipantDto> {
    participants.iter().map(dto::ParticipantDto::from).collect()
}

impl From<&ServerEvent> for dto::OutgoingFrame {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::Chat(message) => Self::Chat {
                message: message.into(),
            },
            ServerEvent::History(messages) => Self::History {
                messages: messages.iter().map(dto::MessagePayload::from).collect(),
            },
            ServerEvent::Participants(participants) => Self::Participants {
                participants: participant_dtos(participants),
            },
            ServerEvent::CallParticipants(participants) => Self::CallParticipants {
                call_users: participant_dtos(participants),
            },
        }
    }
}
