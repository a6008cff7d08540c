use crate::{health, rooms};

use collab_ws::AppState;

use axum::{Router, http::StatusCode, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints.
///
/// `/metrics` is only served when a Prometheus recorder handle is supplied.
pub fn build_router(state: AppState, metrics: Option<PrometheusHandle>) -> Router {
    let router = Router::new()
        // Session bootstrap
        .route("/ws", get(collab_ws::handler))
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        // Introspection
        .route("/rooms", get(rooms::list_rooms));

    let router = match metrics {
        Some(handle) => router.route("/metrics", get(move || async move { handle.render() })),
        None => router.route(
            "/metrics",
            get(|| async { (StatusCode::NOT_FOUND, "Metrics recorder not installed") }),
        ),
    };

    router
        .with_state(state)
        // CORS middleware (allow all origins for WebSocket)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
