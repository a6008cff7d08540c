mod common;

use common::test_client::WsTestClient;
use common::test_server::{create_test_server, wait_for_member_count};

use std::time::Duration;

use serde_json::json;

#[tokio::test]
async fn given_empty_room_when_two_users_edit_and_leave_then_room_reclaimed() {
    let server = create_test_server();
    let hub = &server.app_state.hub;
    assert!(hub.get_room("P1").await.is_none());

    // A and B join
    let mut a = WsTestClient::connect(&server.server, "P1", "u1", "alice").await;
    let mut b = WsTestClient::connect(&server.server, "P1", "u2", "bob").await;
    assert_eq!(a.receive_envelope().await["user_id"], "u2");

    // A edits, B sees it attributed to A with data untouched
    let data = json!({"ops": [{"insert": "hello"}], "rev": 7});
    a.send_json(&json!({"type": "edit", "data": data})).await;

    let edit = b.receive_envelope().await;
    assert_eq!(edit["type"], "edit");
    assert_eq!(edit["user_id"], "u1");
    assert_eq!(edit["data"], data);

    // A leaves, B sees the departure
    a.close().await;
    let left = b.receive_envelope_of_type("user_left").await;
    assert_eq!(left["user_id"], "u1");
    assert_eq!(left["data"]["users_count"], 1);

    // B leaves, the room goes away
    b.close().await;
    assert!(wait_for_member_count(&server.app_state, 0).await);
    for _ in 0..100 {
        if hub.get_room("P1").await.is_none() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(hub.get_room("P1").await.is_none());
}
