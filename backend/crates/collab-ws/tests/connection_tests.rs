mod common;

use common::test_client::WsTestClient;
use common::test_server::{
    TestServerConfig, create_test_server, create_test_server_with_config, wait_for_member_count,
};

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn given_all_parameters_when_connecting_then_joined_with_own_roster() {
    // Given
    let server = create_test_server();

    // When
    let mut client = WsTestClient::connect_raw(&server.server, "p1", "u1", "alice").await;

    // Then
    let joined = client.receive_envelope().await;
    assert_eq!(joined["type"], "user_joined");
    assert_eq!(joined["project_id"], "p1");
    assert_eq!(joined["username"], "alice");
    assert_eq!(joined["data"]["users_count"], 1);
    assert_eq!(
        joined["data"]["users"],
        json!([{"user_id": "u1", "username": "alice"}])
    );

    client.close().await;
}

#[tokio::test]
async fn given_missing_username_when_connecting_then_bad_request() {
    let server = create_test_server();

    let response = server
        .server
        .get_websocket("/ws")
        .add_query_param("project_id", "p1")
        .add_query_param("user_id", "u1")
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "MISSING_PARAMETERS");
    assert_eq!(
        body["error"]["message"],
        "Missing required parameters: project_id, user_id, username"
    );
    assert_eq!(server.app_state.hub.room_count().await, 0);
}

#[tokio::test]
async fn given_connected_client_when_closed_then_server_cleans_up() {
    // Given
    let server = create_test_server();
    let client = WsTestClient::connect(&server.server, "p1", "u1", "alice").await;
    assert_eq!(server.app_state.hub.member_count().await, 1);

    // When
    client.close().await;

    // Then - member gone and the empty room reclaimed
    assert!(wait_for_member_count(&server.app_state, 0).await);
    for _ in 0..100 {
        if server.app_state.hub.room_count().await == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(server.app_state.hub.get_room("p1").await.is_none());
}

#[tokio::test]
async fn given_malformed_frame_when_sent_then_dropped_and_connection_stays_open() {
    // Given
    let server = create_test_server();
    let mut client = WsTestClient::connect(&server.server, "p1", "u1", "alice").await;

    // When
    client.send_text("this is not json").await;
    client.send_text(r#"{"data":{"missing":"type"}}"#).await;
    client.send_json(&json!({"type": "edit", "data": {"ok": true}})).await;

    // Then - only the valid event comes back (echo to sender)
    let echoed = client.receive_envelope().await;
    assert_eq!(echoed["type"], "edit");
    assert_eq!(echoed["data"], json!({"ok": true}));

    client.close().await;
}

#[tokio::test]
async fn given_client_sends_system_type_when_relayed_then_rejected() {
    let server = create_test_server();
    let mut client = WsTestClient::connect(&server.server, "p1", "u1", "alice").await;

    client
        .send_json(&json!({"type": "user_left", "data": {"users_count": 0}}))
        .await;

    assert!(
        client
            .try_receive_envelope(Duration::from_millis(200))
            .await
            .is_none()
    );
    assert_eq!(server.app_state.hub.member_count().await, 1);

    client.close().await;
}

#[tokio::test]
async fn given_silent_client_when_read_timeout_elapses_then_disconnected() {
    // Given - the client never reads, so pings go unanswered
    let server = create_test_server_with_config(TestServerConfig::with_read_timeout_secs(1));
    let _client = WsTestClient::connect(&server.server, "p1", "u1", "alice").await;
    assert_eq!(server.app_state.hub.member_count().await, 1);

    // When
    tokio::time::sleep(Duration::from_millis(1500)).await;

    // Then
    assert!(wait_for_member_count(&server.app_state, 0).await);
}

#[tokio::test]
async fn given_shutdown_when_triggered_then_connections_closed() {
    // Given
    let server = create_test_server();
    let mut client = WsTestClient::connect(&server.server, "p1", "u1", "alice").await;

    // When
    server.app_state.shutdown.shutdown();

    // Then
    assert!(client.receives_close(Duration::from_secs(2)).await);
    assert!(wait_for_member_count(&server.app_state, 0).await);
}
