//! Shared helpers for integration tests: an in-process server and a
//! WebSocket test client.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use parlor_server::{
    config::HubConfig,
    domain::{Identity, RoomId, UserId},
    infrastructure::{
        identity::JwtIdentityVerifier, message_pusher::ConnectionHub,
        repository::InMemoryRoomStore,
    },
    ui::{AppState, Server},
};
use serde_json::Value;
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Error as WsError, Message},
};

pub const TEST_SECRET: &str = "parlor_integration_secret_long_enough_for_hs256";

/// How long a test waits for a single frame before failing
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Helper struct to manage an in-process server
pub struct TestServer {
    pub addr: SocketAddr,
    pub room_id: RoomId,
    pub alice: Identity,
    pub bob: Identity,
    pub carol: Identity,
    /// Valid token, but not a member of the room
    pub mallory: Identity,
    pub store: Arc<InMemoryRoomStore>,
    pub hub: Arc<ConnectionHub>,
    verifier: JwtIdentityVerifier,
    task: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(HubConfig::default()).await
    }

    /// Start a server on an ephemeral port with one room (alice, bob, carol)
    pub async fn start_with(config: HubConfig) -> Self {
        let store = Arc::new(InMemoryRoomStore::new(Arc::new(
            parlor_shared::time::SystemClock,
        )));
        let room_id = RoomId::generate();
        let alice = Identity::new(UserId::generate(), "alice");
        let bob = Identity::new(UserId::generate(), "bob");
        let carol = Identity::new(UserId::generate(), "carol");
        let mallory = Identity::new(UserId::generate(), "mallory");
        store.create_room(room_id, "lobby").await;
        for member in [&alice, &bob, &carol] {
            store
                .add_member(&room_id, member.user_id, member.display_name.clone())
                .await
                .unwrap();
        }

        let verifier = JwtIdentityVerifier::new(TEST_SECRET).unwrap();
        let hub = Arc::new(ConnectionHub::new());
        let state = AppState::new(
            store.clone(),
            Arc::new(verifier.clone()),
            hub.clone(),
            config.validate().unwrap(),
        );
        let app = Server::new(state).router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer {
            addr,
            room_id,
            alice,
            bob,
            carol,
            mallory,
            store,
            hub,
            verifier,
            task,
        }
    }

    pub fn token(&self, identity: &Identity) -> String {
        self.verifier.issue_token(identity).unwrap()
    }

    pub fn ws_url(&self, room_id: &str, token: Option<&str>) -> String {
        match token {
            Some(token) => format!("ws://{}/ws/rooms/{}?token={}", self.addr, room_id, token),
            None => format!("ws://{}/ws/rooms/{}", self.addr, room_id),
        }
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Connect `identity` to the test room
    pub async fn connect(&self, identity: &Identity) -> TestClient {
        let url = self.ws_url(&self.room_id.to_string(), Some(&self.token(identity)));
        TestClient::connect(&url).await.unwrap()
    }

    /// Connect and consume the four bootstrap frames
    pub async fn join(&self, identity: &Identity) -> TestClient {
        let mut client = self.connect(identity).await;
        client.expect_type("participants").await;
        client.expect_type("call_participants").await;
        client.expect_type("history").await;
        client.expect_type("call_participants").await;
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Helper struct wrapping a WebSocket client connection
pub struct TestClient {
    stream: WsStream,
}

impl TestClient {
    pub async fn connect(url: &str) -> Result<Self, WsError> {
        let (stream, _) = connect_async(url).await?;
        Ok(Self { stream })
    }

    pub async fn send_json(&mut self, value: Value) {
        self.stream
            .send(Message::text(value.to_string()))
            .await
            .unwrap();
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.stream.send(Message::text(text)).await.unwrap();
    }

    /// Next JSON frame, skipping control frames
    ///
    /// Returns `None` if the server closed the connection.
    pub async fn next_json(&mut self) -> Option<Value> {
        loop {
            let message = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for a frame")?;
            match message {
                Ok(Message::Text(text)) => return Some(serde_json::from_str(text.as_str()).unwrap()),
                Ok(Message::Close(_)) | Err(_) => return None,
                Ok(_) => continue,
            }
        }
    }

    /// Next frame, asserting its `type`
    pub async fn expect_type(&mut self, kind: &str) -> Value {
        let frame = self
            .next_json()
            .await
            .unwrap_or_else(|| panic!("connection closed while waiting for '{kind}'"));
        assert_eq!(frame["type"], kind, "unexpected frame: {frame}");
        frame
    }

    /// Assert that no data frame arrives within `wait`
    pub async fn expect_silence(&mut self, wait: Duration) {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            match tokio::time::timeout_at(deadline, self.stream.next()).await {
                Err(_) => return,
                Ok(Some(Ok(Message::Text(text)))) => panic!("unexpected frame: {text}"),
                Ok(Some(Ok(_))) => continue,
                Ok(_) => panic!("connection closed"),
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }

    /// Read until the server closes the connection, returning how many data
    /// frames were still buffered
    pub async fn drain_until_closed(mut self) -> usize {
        let mut frames = 0;
        while self.next_json().await.is_some() {
            frames += 1;
        }
        frames
    }
}

/// Usernames in a participant list, in order
pub fn usernames(list: &Value) -> Vec<String> {
    list.as_array()
        .expect("participant list should be an array")
        .iter()
        .map(|participant| participant["username"].as_str().unwrap().to_string())
        .collect()
}

/// HTTP status of a rejected upgrade
pub async fn rejected_status(url: &str) -> u16 {
    match TestClient::connect(url).await {
        Ok(_) => panic!("upgrade unexpectedly succeeded"),
        Err(WsError::Http(response)) => response.status().as_u16(),
        Err(other) => panic!("unexpected error: {other}"),
    }
}
