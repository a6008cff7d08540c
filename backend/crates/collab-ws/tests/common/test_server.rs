#![allow(dead_code)]

use collab_ws::{AppState, ConnectionConfig, Hub, Metrics, RoomSettings, ShutdownCoordinator};

use std::time::Duration;

use axum::{Router, routing::get};
use axum_test::TestServer;

/// Configuration for test server instances
#[derive(Debug, Clone, Default)]
pub struct TestServerConfig {
    pub room: RoomSettings,
    pub connection: ConnectionConfig,
}

impl TestServerConfig {
    /// Rooms that fill up after `max_members`
    pub fn with_max_members(max_members: usize) -> Self {
        Self {
            room: RoomSettings {
                max_members,
                ..RoomSettings::default()
            },
            ..Default::default()
        }
    }

    /// Short read timeout (for heartbeat tests)
    pub fn with_read_timeout_secs(read_timeout_secs: u64) -> Self {
        Self {
            connection: ConnectionConfig {
                read_timeout_secs,
                ..ConnectionConfig::default()
            },
            ..Default::default()
        }
    }
}

/// Test server with access to AppState for testing
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
}

/// Create a TestServer with default configuration
pub fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(TestServerConfig::default())
}

/// Create a TestServer with custom configuration
pub fn create_test_server_with_config(config: TestServerConfig) -> TestServerWithState {
    let (app, app_state) = create_app(config);
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState { server, app_state }
}

/// Build the Axum Router with AppState
fn create_app(config: TestServerConfig) -> (Router, AppState) {
    let metrics = Metrics::default();

    let app_state = AppState {
        hub: Hub::new(config.room, metrics.clone()),
        metrics,
        shutdown: ShutdownCoordinator::new(),
        config: config.connection,
    };

    let router = Router::new()
        .route("/ws", get(collab_ws::handler))
        .with_state(app_state.clone());

    (router, app_state)
}

/// Poll until the hub reports `expected` members, or give up after a second
pub async fn wait_for_member_count(app_state: &AppState, expected: usize) -> bool {
    for _ in 0..100 {
        if app_state.hub.member_count().await == expected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
