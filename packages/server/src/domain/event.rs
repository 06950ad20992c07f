//! Events pushed from the hub to connections.
//!
//! ワイヤ形式（JSON）への変換は Infrastructure 層の DTO が担当する。

use super::entity::{Participant, StoredMessage};

/// One outbound event, queued per connection and encoded by its write loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// A newly persisted chat message
    Chat(StoredMessage),
    /// Recent room history, oldest first
    History(Vec<StoredMessage>),
    /// Users currently connected to the room
    Participants(Vec<Participant>),
    /// Users currently in the room's live call
    CallParticipants(Vec<Participant>),
}

impl ServerEvent {
    /// Short name for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            ServerEvent::Chat(_) => "chat",
            ServerEvent::History(_) => "history",
            ServerEvent::Participants(_) => "participants",
            ServerEvent::CallParticipants(_) => "call_participants",
        }
    }
}
