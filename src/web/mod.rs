//! Scrape server exposing the metric registry over HTTP.
//!
//! The server only reads instrument values; it never talks to the device and
//! does not interact with the poll cadence.

pub mod config;
pub mod handlers;
pub mod router;

// Re-export commonly used items
pub use config::WebConfig;
pub use router::create_app;

use crate::error::{ExporterError, Result};
use crate::metrics::MetricRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Serve the registry until `shutdown` is cancelled.
///
/// Binding failures are returned immediately so the caller can abort startup.
pub async fn start_web_server(
    config: WebConfig,
    registry: Arc<MetricRegistry>,
    shutdown: CancellationToken,
) -> Result<()> {
    let app = create_app(&config, registry);

    let addr = config
        .bind_address()
        .parse::<SocketAddr>()
        .map_err(|e| ExporterError::web_server_error(format!("Invalid bind address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ExporterError::web_server_error(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Started Prometheus exporter on port {}", config.port);
    info!("Metrics available at http://{}{}", addr, config.metrics_path);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| ExporterError::web_server_error(format!("Server error: {}", e)))?;

    Ok(())
}
