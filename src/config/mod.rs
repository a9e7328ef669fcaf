//! Configuration module
//!
//! Handles loading and managing configuration. Values resolve in the order
//! CLI flag, environment, config file, built-in default.

mod env;
mod file;

pub use env::{env_help, EnvConfig, ENV_PREFIX};
pub use file::ConfigFile;

use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::output::OutputFormat;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8001";
pub const DEFAULT_CLIENT_ID: &str = "e2e-test-client";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_GRACE_SECS: u64 = 2;
pub const DEFAULT_BACKEND_HOST: &str = "localhost";
pub const DEFAULT_BACKEND_PORT: u16 = 3000;

/// Configuration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid server URL '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("Unsupported URL scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    #[error("Client ID must not be empty")]
    EmptyClientId,

    #[error("Timeout must be at least one second")]
    ZeroTimeout,

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    #[error("Invalid value '{value}' for {name}")]
    InvalidEnvValue { name: String, value: String },
}

/// Test runner configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Public entry point of the tunnel
    pub server_url: String,

    /// Client identifier the backend is registered under
    pub client_id: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Delay before the first request, in seconds
    pub grace_secs: u64,

    /// Output format (table, json, json-pretty, summary)
    pub format: String,

    /// Colorize table output
    pub color: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            grace_secs: DEFAULT_GRACE_SECS,
            format: "table".to_string(),
            color: true,
        }
    }
}

impl RunnerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_secs)
    }

    /// Server URL without a trailing slash
    pub fn normalized_server_url(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }

    /// Parse the tunnel base URL
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let url =
            Url::parse(self.normalized_server_url()).map_err(|e| ConfigError::InvalidServerUrl {
                url: self.server_url.clone(),
                reason: e.to_string(),
            })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
    }

    pub fn output_format(&self) -> Result<OutputFormat, ConfigError> {
        OutputFormat::from_str(&self.format)
            .ok_or_else(|| ConfigError::UnknownFormat(self.format.clone()))
    }

    /// Check every field that would otherwise fail mid-run
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::EmptyClientId);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        self.output_format()?;
        Ok(())
    }
}

/// Mock backend configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub host: String,
    pub port: u16,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BACKEND_HOST.to_string(),
            port: DEFAULT_BACKEND_PORT,
        }
    }
}
