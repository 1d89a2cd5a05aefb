//! Exporter configuration from command-line flags and environment variables.
//!
//! Every setting can come from a flag or from an `HW_EXPORTER_*` environment
//! variable. When both are present the environment variable wins, and empty
//! environment variables are treated as unset.

use crate::error::{ExporterError, Result};
use crate::{DEFAULT_INTERVAL_SECS, MIN_INTERVAL_SECS};
use clap::Parser;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_ENDPOINT: &str = "HW_EXPORTER_ENDPOINT";
pub const ENV_PORT: &str = "HW_EXPORTER_PORT";
pub const ENV_INTERVAL: &str = "HW_EXPORTER_INTERVAL";
pub const ENV_LOGLEVEL: &str = "HW_EXPORTER_LOGLEVEL";
pub const ENV_HOST: &str = "HW_EXPORTER_HOST";

/// Command-line flags.
#[derive(Parser, Debug, Clone)]
#[command(name = "homewizard_exporter")]
#[command(about = "HomeWizard Energy Prometheus Exporter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Set the HomeWizard Energy endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Set the HomeWizard Exporter port
    #[arg(long)]
    pub port: Option<u16>,

    /// Set the HomeWizard Exporter interval in seconds (min 5 seconds)
    #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval: u64,

    /// Set the logging level (DEBUG, INFO, WARNING, ERROR, CRITICAL)
    #[arg(long, default_value = "INFO")]
    pub loglevel: String,

    /// Address the scrape endpoint binds to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,
}

/// Log severity names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// The `tracing` level this severity maps to.
    pub fn as_tracing_level(self) -> tracing::Level {
        match self {
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warning => tracing::Level::WARN,
            Self::Error | Self::Critical => tracing::Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ExporterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "CRITICAL" | "FATAL" => Ok(Self::Critical),
            _ => Err(ExporterError::config_error(format!("Invalid log level: {}", s))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        };
        f.write_str(name)
    }
}

/// Fully resolved and validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Device address: host, `host:port` or base URL
    pub endpoint: String,
    /// Scrape endpoint bind address
    pub host: String,
    /// Scrape endpoint port
    pub port: u16,
    /// Delay between polls
    pub interval: Duration,
    /// Minimum level of emitted log lines
    pub log_level: LogLevel,
}

impl Config {
    /// Merge flags with environment variables and validate the result.
    ///
    /// `env` looks up a variable by name; pass `|key| std::env::var(key).ok()`
    /// for the process environment.
    pub fn resolve<F>(args: &Args, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let endpoint = env(ENV_ENDPOINT)
            .or_else(|| args.endpoint.clone())
            .filter(|endpoint| !endpoint.trim().is_empty())
            .ok_or_else(|| {
                ExporterError::config_error(format!(
                    "The ENDPOINT must be set via environment variable {} or --endpoint argument",
                    ENV_ENDPOINT
                ))
            })?;

        let port = match env(ENV_PORT) {
            Some(raw) => parse_port(&raw)?,
            None => args.port.ok_or_else(|| {
                ExporterError::config_error(format!(
                    "The PORT must be set via environment variable {} or --port argument",
                    ENV_PORT
                ))
            })?,
        };
        if port == 0 {
            return Err(ExporterError::config_error("The PORT must not be 0"));
        }

        let interval_secs = match env(ENV_INTERVAL) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ExporterError::config_error(format!(
                    "The INTERVAL must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?,
            None => args.interval,
        };
        if interval_secs < MIN_INTERVAL_SECS {
            return Err(ExporterError::config_error(format!(
                "The INTERVAL must be equal to or greater than {} seconds",
                MIN_INTERVAL_SECS
            )));
        }

        let log_level = env(ENV_LOGLEVEL)
            .unwrap_or_else(|| args.loglevel.clone())
            .parse::<LogLevel>()?;

        let host = env(ENV_HOST).unwrap_or_else(|| args.host.clone());

        Ok(Self {
            endpoint: endpoint.trim().to_string(),
            host,
            port,
            interval: Duration::from_secs(interval_secs),
            log_level,
        })
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.trim().parse::<u16>().map_err(|_| {
        ExporterError::config_error(format!(
            "The PORT must be a number between 1 and 65535, got '{}'",
            raw
        ))
    })
}
