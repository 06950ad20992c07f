//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object discriminated by its `type` field.

use serde::{Deserialize, Serialize};

/// Client → server frame
///
/// Unknown `type` values and malformed payloads fail to deserialize and are
/// dropped by the read loop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IncomingFrame {
    Chat {
        #[serde(default)]
        content: String,
    },
    CallJoin,
    CallLeave,
}

/// Server → client frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutgoingFrame {
    Chat { message: MessagePayload },
    History { messages: Vec<MessagePayload> },
    Participants { participants: Vec<ParticipantDto> },
    CallParticipants { call_users: Vec<ParticipantDto> },
}

/// Persisted message as sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub id: i64,
    pub room_id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    /// `"text"` or `"image"`
    pub message_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    /// RFC 3339 with millisecond precision
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub id: String,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_frame() {
        // テスト項目: chat フレームをパースできる
        // given (前提条件):
        let json = r#"{"type":"chat","content":"hi"}"#;

        // when (操作):
        let frame: IncomingFrame = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            frame,
            IncomingFrame::Chat {
                content: "hi".to_string()
            }
        );
    }

    #[test]
    fn test_parse_chat_frame_without_content() {
        // テスト項目: content を省略した chat フレームは空文字になる
        // given (前提条件):
        let json = r#"{"type":"chat"}"#;

        // when (操作):
        let frame: IncomingFrame = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            frame,
            IncomingFrame::Chat {
                content: String::new()
            }
        );
    }

    #[test]
    fn test_parse_call_frames() {
        // テスト項目: call_join / call_leave をパースできる（余分なフィールドは無視）
        // given (前提条件):
        let join = r#"{"type":"call_join"}"#;
        let leave = r#"{"type":"call_leave","extra":1}"#;

        // when (操作):
        let join: IncomingFrame = serde_json::from_str(join).unwrap();
        let leave: IncomingFrame = serde_json::from_str(leave).unwrap();

        // then (期待する結果):
        assert_eq!(join, IncomingFrame::CallJoin);
        assert_eq!(leave, IncomingFrame::CallLeave);
    }

    #[test]
    fn test_unknown_or_malformed_frames_fail_to_parse() {
        // テスト項目: 未知の type や JSON でない入力はパースエラーになる
        // given (前提条件):
        let inputs = [r#"{"type":"typing"}"#, r#"{"content":"hi"}"#, "not json", "[]"];

        // when (操作) / then (期待する結果):
        for input in inputs {
            assert!(serde_json::from_str::<IncomingFrame>(input).is_err(), "{input}");
        }
    }

    #[test]
    fn test_serialize_empty_call_participants_keeps_list() {
        // テスト項目: 空の通話参加者リストも `[]` として出力される
        // given (前提条件):
        let frame = OutgoingFrame::CallParticipants { call_users: vec![] };

        // when (操作):
        let json = serde_json::to_value(&frame).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({ "type": "call_participants", "call_users": [] })
        );
    }

    #[test]
    fn test_serialize_chat_frame_omits_missing_media_url() {
        // テスト項目: media_url が無いメッセージはフィールド自体を出力しない
        // given (前提条件):
        let frame = OutgoingFrame::Chat {
            message: MessagePayload {
                id: 7,
                room_id: "r".to_string(),
                user_id: "u".to_string(),
                username: "alice".to_string(),
                content: "hi".to_string(),
                message_type: "text".to_string(),
                media_url: None,
                created_at: "2023-11-14T22:13:20.000Z".to_string(),
            },
        };

        // when (操作):
        let json = serde_json::to_value(&frame).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "chat");
        assert_eq!(json["message"]["id"], 7);
        assert_eq!(json["message"]["message_type"], "text");
        assert!(json["message"].get("media_url").is_none());
    }
}
