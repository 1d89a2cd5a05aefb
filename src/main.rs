//! HomeWizard Exporter binary
//!
//! Polls a HomeWizard Energy device and serves its readings to Prometheus.

use clap::{error::ErrorKind, CommandFactory, Parser};
use homewizard_exporter::{
    logging::Logfmt, start_web_server, Args, Config, HomeWizardClient, LogLevel, MetricRegistry,
    Poller, WebConfig,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match Config::resolve(&args, |key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => Args::command().error(ErrorKind::ValueValidation, e).exit(),
    };

    init_logging(config.log_level)?;

    info!("Starting HomeWizard exporter v{}", env!("CARGO_PKG_VERSION"));
    info!("  - Endpoint: {}", config.endpoint);
    info!("  - Interval: {}s", config.interval.as_secs());
    info!("  - Log level: {}", config.log_level);

    let client = match HomeWizardClient::new(&config.endpoint) {
        Ok(client) => client,
        Err(e) => Args::command().error(ErrorKind::ValueValidation, e).exit(),
    };
    let registry = Arc::new(MetricRegistry::new()?);
    let cancel = CancellationToken::new();

    tokio::spawn(watch_for_shutdown(cancel.clone()));

    let poller = Poller::new(client, registry.clone(), config.interval);
    let poll_task = tokio::spawn(poller.run(cancel.clone()));

    let served = start_web_server(WebConfig::from(&config), registry, cancel.clone()).await;

    // The server also returns on bind failure; stop polling either way.
    cancel.cancel();
    poll_task.await?;
    served?;

    debug!("Prometheus exporter stopped");
    Ok(())
}

fn init_logging(level: LogLevel) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_tracing_level().to_string().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .event_format(Logfmt)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

async fn watch_for_shutdown(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
    cancel.cancel();
}
