//! Connection pump: one read loop and one write loop per socket.
//!
//! The two loops share nothing but the outbound queue and the close signal.
//!
//! - read loop: decodes client frames, drives chat and call presence, and
//!   enforces the idle window (only a pong extends it)
//! - write loop: drains the outbound queue, sends pings, and bounds every
//!   write by the write timeout

use std::{fmt, sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::ws::{Message, WebSocket},
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::time::{Instant, MissedTickBehavior, interval_at, timeout, timeout_at};
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{ConnectionId, PusherReceiver, RoomId, ServerEvent, UserId},
    infrastructure::dto::websocket::{IncomingFrame, OutgoingFrame},
    ui::state::AppState,
    usecase::SendMessageError,
};

/// Why a loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// Peer sent a close frame or the stream ended
    PeerClosed,
    /// No pong within the idle window
    IdleTimeout,
    ReadError(String),
    WriteError(String),
    WriteTimeout,
    /// Every sender of the outbound queue is gone
    QueueClosed,
    /// Close signal tripped (eviction or the other loop exiting)
    Cancelled,
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisconnectReason::PeerClosed => f.write_str("peer closed"),
            DisconnectReason::IdleTimeout => f.write_str("idle timeout"),
            DisconnectReason::ReadError(e) => write!(f, "read error: {e}"),
            DisconnectReason::WriteError(e) => write!(f, "write error: {e}"),
            DisconnectReason::WriteTimeout => f.write_str("write timeout"),
            DisconnectReason::QueueClosed => f.write_str("outbound queue closed"),
            DisconnectReason::Cancelled => f.write_str("closed by hub"),
        }
    }
}

/// Everything the read loop needs to act on client frames
pub struct ReadContext {
    pub state: Arc<AppState>,
    pub connection_id: ConnectionId,
    pub room_id: RoomId,
    pub user_id: UserId,
    pub closer: CancellationToken,
    pub idle_timeout: Duration,
}

pub async fn read_loop(mut receiver: SplitStream<WebSocket>, ctx: ReadContext) -> DisconnectReason {
    let mut deadline = Instant::now() + ctx.idle_timeout;
    let mut in_call = false;

    loop {
        let message = tokio::select! {
            _ = ctx.closer.cancelled() => return DisconnectReason::Cancelled,
            next = timeout_at(deadline, receiver.next()) => match next {
                Err(_) => return DisconnectReason::IdleTimeout,
                Ok(None) => return DisconnectReason::PeerClosed,
                Ok(Some(Err(e))) => return DisconnectReason::ReadError(e.to_string()),
                Ok(Some(Ok(message))) => message,
            },
        };

        match message {
            Message::Text(text) => handle_frame(&ctx, text.as_str(), &mut in_call).await,
            Message::Pong(_) => {
                deadline = Instant::now() + ctx.idle_timeout;
            }
            Message::Close(_) => return DisconnectReason::PeerClosed,
            // ping は WebSocket 層が自動で pong を返す
            Message::Ping(_) | Message::Binary(_) => {}
        }
    }
}

async fn handle_frame(ctx: &ReadContext, text: &str, in_call: &mut bool) {
    let frame = match serde_json::from_str::<IncomingFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!(connection_id = %ctx.connection_id, "Ignoring malformed frame: {}", e);
            return;
        }
    };

    match frame {
        IncomingFrame::Chat { content } => {
            match ctx
                .state
                .send_message_usecase
                .execute(&ctx.room_id, &ctx.user_id, content)
                .await
            {
                Ok(_) => {}
                Err(SendMessageError::EmptyContent) => {
                    tracing::debug!(connection_id = %ctx.connection_id, "Ignoring empty chat frame");
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = %ctx.connection_id,
                        room_id = %ctx.room_id,
                        user_id = %ctx.user_id,
                        "Dropping chat frame: {}",
                        e
                    );
                }
            }
        }
        IncomingFrame::CallJoin => {
            if !*in_call {
                *in_call = true;
                ctx.state
                    .call_presence_usecase
                    .join(&ctx.connection_id, &ctx.room_id)
                    .await;
            }
        }
        IncomingFrame::CallLeave => {
            if *in_call {
                *in_call = false;
                ctx.state
                    .call_presence_usecase
                    .leave(&ctx.connection_id, &ctx.room_id)
                    .await;
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WriteSettings {
    pub ping_interval: Duration,
    pub write_timeout: Duration,
}

/// Drain the outbound queue into the socket until something fails or the
/// close signal trips. Always trips the close signal on exit.
pub async fn write_loop(
    mut sender: SplitSink<WebSocket, Message>,
    mut rx: PusherReceiver,
    closer: CancellationToken,
    settings: WriteSettings,
) -> DisconnectReason {
    let mut ping = interval_at(
        Instant::now() + settings.ping_interval,
        settings.ping_interval,
    );
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let reason = loop {
        tokio::select! {
            biased;
            _ = closer.cancelled() => break DisconnectReason::Cancelled,
            event = rx.recv() => {
                let Some(event) = event else {
                    break DisconnectReason::QueueClosed;
                };
                let Some(text) = encode_event(&event) else {
                    continue;
                };
                if let Err(reason) = send(&mut sender, Message::Text(text.into()), settings.write_timeout).await {
                    break reason;
                }
            }
            _ = ping.tick() => {
                if let Err(reason) = send(&mut sender, Message::Ping(Bytes::new()), settings.write_timeout).await {
                    break reason;
                }
            }
        }
    };

    if matches!(reason, DisconnectReason::Cancelled | DisconnectReason::QueueClosed) {
        let _ = timeout(settings.write_timeout, sender.send(Message::Close(None))).await;
    }
    closer.cancel();
    reason
}

async fn send(
    sender: &mut SplitSink<WebSocket, Message>,
    message: Message,
    write_timeout: Duration,
) -> Result<(), DisconnectReason> {
    match timeout(write_timeout, sender.send(message)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(DisconnectReason::WriteError(e.to_string())),
        Err(_) => Err(DisconnectReason::WriteTimeout),
    }
}

fn encode_event(event: &ServerEvent) -> Option<String> {
    match serde_json::to_string(&OutgoingFrame::from(event)) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::error!(kind = event.kind(), "Failed to encode event: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Participant;

    #[test]
    fn test_encode_call_participants_event() {
        // テスト項目: イベントは type 付きの JSON に変換される
        // given (前提条件):
        let alice = Participant::new(UserId::generate(), "alice");
        let event = ServerEvent::CallParticipants(vec![alice.clone()]);

        // when (操作):
        let text = encode_event(&event).unwrap();

        // then (期待する結果):
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "call_participants",
                "call_users": [{ "id": alice.user_id.to_string(), "username": "alice" }]
            })
        );
    }

    #[test]
    fn test_disconnect_reason_display() {
        // テスト項目: 切断理由はログ向けの短い文字列になる
        // given (前提条件) / when (操作) / then (期待する結果):
        assert_eq!(DisconnectReason::IdleTimeout.to_string(), "idle timeout");
        assert_eq!(
            DisconnectReason::WriteError("broken pipe".to_string()).to_string(),
            "write error: broken pipe"
        );
    }
}
