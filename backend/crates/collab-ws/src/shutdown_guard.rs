use crate::ShutdownCoordinator;

use tokio::sync::watch;

/// Per-task view of the shutdown signal
pub struct ShutdownGuard {
    shutdown_rx: watch::Receiver<bool>,
}

impl ShutdownGuard {
    pub fn new(coordinator: &ShutdownCoordinator) -> Self {
        Self {
            shutdown_rx: coordinator.subscribe(),
        }
    }

    /// Resolves once shutdown has been triggered (immediately if it already was)
    pub async fn wait(&mut self) {
        if self.shutdown_rx.wait_for(|triggered| *triggered).await.is_err() {
            // Coordinator dropped without triggering: never resolve
            std::future::pending::<()>().await;
        }
    }

    /// Non-blocking check
    pub fn is_triggered(&self) -> bool {
        *self.shutdown_rx.borrow()
    }
}
