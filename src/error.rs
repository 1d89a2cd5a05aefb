//! Error handling for the HomeWizard exporter crate.

/// A specialized `Result` type for exporter operations.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// The main error type for exporter operations.
#[derive(Debug, thiserror::Error)]
pub enum ExporterError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid startup configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP request to the device failed
    #[error("Device request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The device answered, but not with usable data
    #[error("Device error: {0}")]
    Device(String),

    /// The device response could not be turned into a snapshot
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// The device returned a snapshot without any fields
    #[error("Device returned no data")]
    EmptySnapshot,

    /// Metric registration or encoding failed
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),
}

impl ExporterError {
    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new device error
    pub fn device_error(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Create a new malformed snapshot error
    pub fn malformed_snapshot(msg: impl Into<String>) -> Self {
        Self::MalformedSnapshot(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ExporterError::config_error("The PORT must be set");
        assert_eq!(err.to_string(), "Configuration error: The PORT must be set");

        let err = ExporterError::device_error("HTTP 500");
        assert!(err.to_string().contains("HTTP 500"));

        assert_eq!(ExporterError::EmptySnapshot.to_string(), "Device returned no data");
    }
}
