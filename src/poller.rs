//! The poll loop driving fetch and projection on a fixed interval.

use crate::device::DeviceClient;
use crate::error::{ExporterError, Result};
use crate::metrics::{project, MetricRegistry};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Polls a device and keeps the registry's instruments current.
pub struct Poller<C> {
    client: C,
    registry: Arc<MetricRegistry>,
    interval: Duration,
}

impl<C: DeviceClient> Poller<C> {
    /// Create a poller writing into `registry` every `interval`.
    pub fn new(client: C, registry: Arc<MetricRegistry>, interval: Duration) -> Self {
        Self {
            client,
            registry,
            interval,
        }
    }

    /// The delay between the end of one cycle and the start of the next.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one fetch and projection.
    ///
    /// Returns the number of instruments written. A snapshot without any
    /// fields counts as a failed cycle.
    pub async fn cycle(&self) -> Result<usize> {
        let snapshot = self.client.fetch_snapshot().await?;
        if snapshot.is_empty() {
            return Err(ExporterError::EmptySnapshot);
        }

        Ok(project(&self.registry, &snapshot))
    }

    /// Poll until `cancel` fires.
    ///
    /// A failed cycle is logged and the loop waits one interval before the
    /// next attempt; errors never end the loop.
    pub async fn run(self, cancel: CancellationToken) {
        info!("Polling device every {}s", self.interval.as_secs());

        loop {
            debug!("updating data");

            let outcome = tokio::select! {
                _ = cancel.cancelled() => break,
                outcome = self.cycle() => outcome,
            };

            match outcome {
                Ok(written) => debug!("Updated {} instruments", written),
                Err(e) => error!("Error fetching data: {}", e),
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        debug!("Poll loop stopped");
    }
}
