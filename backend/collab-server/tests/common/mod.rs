#![allow(dead_code)]

//! Test infrastructure for collab-server route tests

use collab_ws::{AppState, ConnectionConfig, Hub, Metrics, RoomSettings, ShutdownCoordinator};

use axum::{Router, body::Body, http::Request, response::Response};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Create AppState for testing
pub fn create_test_app_state() -> AppState {
    let metrics = Metrics::new();

    AppState {
        hub: Hub::new(RoomSettings::default(), metrics.clone()),
        metrics,
        shutdown: ShutdownCoordinator::new(),
        config: ConnectionConfig::default(),
    }
}

/// Issue a GET against the router
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON
pub async fn json_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Collect a response body as text
pub async fn text_body(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}
