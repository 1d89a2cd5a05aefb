//! # HomeWizard Exporter
//!
//! Polls a HomeWizard Energy device (P1 meter, water meter, kWh meter) over
//! its local HTTP API and republishes the readings as Prometheus metrics.
//!
//! ## Features
//!
//! - **Fixed-interval polling**: one snapshot per interval, failures never stop the loop
//! - **Typed projection**: numeric fields become gauges, text and timestamps become info metrics
//! - **Scrape endpoint**: Prometheus text format on `/` and `/metrics`, health on `/health`
//! - **Library + Binary**: use as a crate or as the `homewizard_exporter` binary
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use homewizard_exporter::{start_web_server, HomeWizardClient, MetricRegistry, Poller, WebConfig};
//! use std::{sync::Arc, time::Duration};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Arc::new(MetricRegistry::new()?);
//!     let client = HomeWizardClient::new("192.168.1.10")?;
//!     let cancel = CancellationToken::new();
//!
//!     let poller = Poller::new(client, registry.clone(), Duration::from_secs(5));
//!     tokio::spawn(poller.run(cancel.clone()));
//!
//!     start_web_server(WebConfig::default().with_port(9100), registry, cancel).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod poller;
pub mod web;

// Re-export public API
pub use config::{Args, Config, LogLevel};
pub use device::{DeviceClient, FieldValue, HomeWizardClient, Snapshot};
pub use error::{ExporterError, Result};
pub use metrics::{project, Instrument, MetricKind, MetricRegistry, SchemaEntry, SCHEMA};
pub use poller::Poller;
pub use web::{start_web_server, WebConfig};

/// Prefix of every exported metric name
pub const METRIC_NAMESPACE: &str = "homewizard";

/// The default polling interval in seconds
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// The shortest polling interval accepted
pub const MIN_INTERVAL_SECS: u64 = 5;

/// The default scrape server port
pub const DEFAULT_WEB_PORT: u16 = 9100;

/// The default path metrics are served on
pub const DEFAULT_METRICS_PATH: &str = "/metrics";
