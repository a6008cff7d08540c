#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use axum_test::{TestServer, TestWebSocket, WsMessage};
use serde_json::Value;
use tokio::time::timeout;

const RECEIVE_TIMEOUT: Duration = Duration::from_secs(2);

/// WebSocket test client wrapper.
///
/// The server may pack several envelopes into one newline-separated frame;
/// the client splits them and hands them out one at a time.
pub struct WsTestClient {
    ws: TestWebSocket,
    pending: VecDeque<Value>,
    pub project_id: String,
    pub user_id: String,
    pub username: String,
}

impl WsTestClient {
    /// Connect and wait for the client's own `user_joined`, so the
    /// connection is known to be a room member when this returns
    pub async fn connect(server: &TestServer, project_id: &str, user_id: &str, username: &str) -> Self {
        let mut client = Self::connect_raw(server, project_id, user_id, username).await;

        let joined = client.receive_envelope().await;
        assert_eq!(joined["type"], "user_joined", "First envelope should be own join");
        assert_eq!(joined["user_id"], user_id);

        client
    }

    /// Upgrade only; nothing is read from the socket
    pub async fn connect_raw(
        server: &TestServer,
        project_id: &str,
        user_id: &str,
        username: &str,
    ) -> Self {
        let ws = server
            .get_websocket("/ws")
            .add_query_param("project_id", project_id)
            .add_query_param("user_id", user_id)
            .add_query_param("username", username)
            .await
            .into_websocket()
            .await;

        Self {
            ws,
            pending: VecDeque::new(),
            project_id: project_id.to_string(),
            user_id: user_id.to_string(),
            username: username.to_string(),
        }
    }

    /// Send text message
    pub async fn send_text(&mut self, text: impl std::fmt::Display) {
        self.ws.send_text(text).await;
    }

    /// Send a JSON value as a text frame
    pub async fn send_json(&mut self, value: &Value) {
        self.ws.send_text(value.to_string()).await;
    }

    /// Next envelope, failing the test if none arrives in time
    pub async fn receive_envelope(&mut self) -> Value {
        self.try_receive_envelope(RECEIVE_TIMEOUT)
            .await
            .expect("Timed out waiting for envelope")
    }

    /// Next envelope, or `None` if nothing arrives within `wait`
    pub async fn try_receive_envelope(&mut self, wait: Duration) -> Option<Value> {
        if let Some(envelope) = self.pending.pop_front() {
            return Some(envelope);
        }

        let text = timeout(wait, self.ws.receive_text()).await.ok()?;
        for line in text.split('\n') {
            let envelope: Value = serde_json::from_str(line).expect("Frame should hold JSON envelopes");
            self.pending.push_back(envelope);
        }

        self.pending.pop_front()
    }

    /// Skip envelopes until one of `kind` arrives
    pub async fn receive_envelope_of_type(&mut self, kind: &str) -> Value {
        loop {
            let envelope = self.receive_envelope().await;
            if envelope["type"] == kind {
                return envelope;
            }
        }
    }

    /// True when the server closes the socket within `wait`
    pub async fn receives_close(&mut self, wait: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            match tokio::time::timeout_at(deadline, self.ws.receive_message()).await {
                Ok(WsMessage::Close(_)) => return true,
                Ok(_) => continue,
                Err(_) => return false,
            }
        }
    }

    /// Close the WebSocket connection
    pub async fn close(self) {
        self.ws.close().await;
    }
}
