//! HTTP client for the HomeWizard Energy local API.

use crate::device::{snapshot::Snapshot, traits::DeviceClient};
use crate::error::{ExporterError, Result};
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::debug;

/// Path of the v1 measurement endpoint.
pub const DATA_PATH: &str = "/api/v1/data";

/// Timeout applied to every device request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for a single HomeWizard Energy device.
#[derive(Debug, Clone)]
pub struct HomeWizardClient {
    http: reqwest::Client,
    data_url: Url,
}

impl HomeWizardClient {
    /// Create a client for the device at `endpoint`.
    ///
    /// `endpoint` may be a bare host (`192.168.1.10`), a `host:port` pair or a
    /// full `http://` / `https://` base URL.
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self> {
        let data_url = data_url(endpoint)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, data_url })
    }

    /// The URL polled on every fetch.
    pub fn data_url(&self) -> &Url {
        &self.data_url
    }
}

impl DeviceClient for HomeWizardClient {
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        debug!("Requesting {}", self.data_url);

        let response = self.http.get(self.data_url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::FORBIDDEN {
            return Err(ExporterError::device_error(
                "local API is disabled, enable it in the HomeWizard Energy app",
            ));
        }
        if !status.is_success() {
            return Err(ExporterError::device_error(format!(
                "unexpected HTTP status {}",
                status
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ExporterError::malformed_snapshot(format!("invalid JSON body: {}", e)))?;

        Snapshot::from_json(body)
    }
}

/// Build the data URL for an endpoint given by the operator.
fn data_url(endpoint: &str) -> Result<Url> {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.is_empty() {
        return Err(ExporterError::config_error("The endpoint must not be empty"));
    }

    let base = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    };

    let url = Url::parse(&format!("{}{}", base, DATA_PATH))
        .map_err(|e| ExporterError::config_error(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

    if url.host_str().is_none() {
        return Err(ExporterError::config_error(format!(
            "Invalid endpoint '{}': no host",
            endpoint
        )));
    }

    Ok(url)
}
