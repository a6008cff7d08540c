mod common;

use common::test_client::WsTestClient;
use common::test_server::{TestServerConfig, create_test_server_with_config, wait_for_member_count};

use axum::http::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn given_full_room_when_another_connects_then_forbidden_with_room_full() {
    // Given - room capacity reached
    let server = create_test_server_with_config(TestServerConfig::default());
    let mut clients = Vec::new();
    for i in 1..=4 {
        let client =
            WsTestClient::connect(&server.server, "p1", &format!("u{i}"), &format!("user{i}"))
                .await;
        clients.push(client);
    }

    // When
    let response = server
        .server
        .get_websocket("/ws")
        .add_query_param("project_id", "p1")
        .add_query_param("user_id", "u5")
        .add_query_param("username", "user5")
        .expect_failure()
        .await;

    // Then
    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "ROOM_FULL");
    assert_eq!(body["error"]["message"], "room full, max 4 users");
    assert_eq!(server.app_state.hub.member_count().await, 4);

    for client in clients {
        client.close().await;
    }
}

#[tokio::test]
async fn given_full_room_when_member_leaves_then_slot_reusable() {
    let server = create_test_server_with_config(TestServerConfig::with_max_members(2));
    let alice = WsTestClient::connect(&server.server, "p1", "u1", "alice").await;
    let bob = WsTestClient::connect(&server.server, "p1", "u2", "bob").await;

    bob.close().await;
    assert!(wait_for_member_count(&server.app_state, 1).await);

    let carol = WsTestClient::connect(&server.server, "p1", "u3", "carol").await;
    assert_eq!(server.app_state.hub.member_count().await, 2);

    alice.close().await;
    carol.close().await;
}

#[tokio::test]
async fn given_full_room_when_other_project_connects_then_admitted() {
    let server = create_test_server_with_config(TestServerConfig::with_max_members(1));
    let alice = WsTestClient::connect(&server.server, "p1", "u1", "alice").await;

    let bob = WsTestClient::connect(&server.server, "p2", "u2", "bob").await;

    assert_eq!(server.app_state.hub.room_count().await, 2);

    alice.close().await;
    bob.close().await;
}
