//! Domain entities
//!
//! - `Participant`: ルームに居るユーザー（ID と表示名）
//! - `StoredMessage`: 永続化済みのメッセージ（採番済み）
//! - `MessageDraft`: 永続化前のメッセージ
//! - `Identity`: トークン検証で得られた呼び出し元

use chrono::{DateTime, Utc};

use super::value_object::{MessageContent, RoomId, UserId};

/// A user as seen in a room snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub user_id: UserId,
    pub display_name: String,
}

impl Participant {
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
        }
    }
}

/// Sort participants by display name, then user id.
///
/// Every snapshot goes through this so clients see a stable order.
pub fn sort_participants(participants: &mut [Participant]) {
    participants.sort_by(|a, b| {
        a.display_name
            .cmp(&b.display_name)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
}

/// Kind of a persisted message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Image,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
        }
    }
}

/// A message after the store assigned its sequence id and timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    /// Sequence id, monotonically increasing per room
    pub id: i64,
    pub room_id: RoomId,
    pub user_id: UserId,
    /// Sender display name at persistence time
    pub username: String,
    pub content: String,
    pub kind: MessageKind,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A message on its way to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub content: String,
    pub kind: MessageKind,
    pub media_url: Option<String>,
}

impl MessageDraft {
    /// Plain chat text typed into a socket
    pub fn text(content: MessageContent) -> Self {
        Self {
            content: content.into_string(),
            kind: MessageKind::Text,
            media_url: None,
        }
    }

    /// Uploaded image with an optional (possibly empty) caption
    pub fn image(caption: impl Into<String>, media_url: impl Into<String>) -> Self {
        Self {
            content: caption.into(),
            kind: MessageKind::Image,
            media_url: Some(media_url.into()),
        }
    }
}

/// Caller identity resolved from an identity token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub display_name: String,
}

impl Identity {
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
        }
    }

    pub fn participant(&self) -> Participant {
        Participant::new(self.user_id, self.display_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_participants_by_name_then_id() {
        // テスト項目: 参加者は表示名順、同名の場合はユーザー ID 順に並ぶ
        // given (前提条件):
        let first_bob = UserId::try_from("00000000-0000-0000-0000-000000000001").unwrap();
        let second_bob = UserId::try_from("00000000-0000-0000-0000-000000000002").unwrap();
        let alice = UserId::generate();
        let mut participants = vec![
            Participant::new(second_bob, "bob"),
            Participant::new(alice, "alice"),
            Participant::new(first_bob, "bob"),
        ];

        // when (操作):
        sort_participants(&mut participants);

        // then (期待する結果):
        assert_eq!(participants[0].user_id, alice);
        assert_eq!(participants[1].user_id, first_bob);
        assert_eq!(participants[2].user_id, second_bob);
    }

    #[test]
    fn test_message_draft_text_has_no_media() {
        // テスト項目: テキストメッセージの下書きはメディア URL を持たない
        // given (前提条件):
        let content = MessageContent::new("hi".to_string()).unwrap();

        // when (操作):
        let draft = MessageDraft::text(content);

        // then (期待する結果):
        assert_eq!(draft.kind, MessageKind::Text);
        assert_eq!(draft.content, "hi");
        assert!(draft.media_url.is_none());
    }

    #[test]
    fn test_message_draft_image_allows_empty_caption() {
        // テスト項目: 画像メッセージはキャプションが空でも作成できる
        // given (前提条件):
        let url = "/uploads/cat.png";

        // when (操作):
        let draft = MessageDraft::image("", url);

        // then (期待する結果):
        assert_eq!(draft.kind, MessageKind::Image);
        assert_eq!(draft.media_url.as_deref(), Some(url));
    }
}
