use collab_server::{build_app_state, build_router, error::ServerError, logger};

use std::error::Error;

use log::{error, info, warn};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // .env is optional (development)
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        return Err(e.into());
    }

    // Load and validate configuration
    let config = collab_config::Config::load()?;
    config.validate()?;

    // Ensure log directory exists when logging to a file
    let log_file_path = config.log_file_path()?;
    if let Some(ref path) = log_file_path
        && let Some(dir) = path.parent()
    {
        std::fs::create_dir_all(dir)?;
    }

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting collab-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::metrics(e.to_string()))?;
    info!("Prometheus recorder installed");

    let app_state = build_app_state(&config);
    let hub = app_state.hub.clone();
    let shutdown = app_state.shutdown.clone();

    let app = build_router(app_state, Some(metrics_handle));

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;

    // Get actual bound address (important when port is 0 / auto-assigned)
    let actual_addr = listener.local_addr()?;
    info!("Server listening on {}", actual_addr);

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    info!("Server ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.subscribe_guard().wait().await;
            info!("No longer accepting connections");
        })
        .await?;

    // Connections normally leave on their own; stop whatever rooms are left
    let remaining = hub.room_count().await;
    if remaining > 0 {
        warn!("{} rooms still active at shutdown, stopping them", remaining);
    }
    hub.shutdown().await;

    info!("Graceful shutdown complete");
    Ok(())
}
