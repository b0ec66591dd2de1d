//! Shutdown signal handling shared by the service binaries

use std::future::Future;
use tracing::{error, info};

/// Resolve once `signal` fires, e.g. `tokio::signal::ctrl_c()`.
///
/// A listener that fails to install never resolves, so the server keeps
/// running instead of shutting down at once.
pub async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
