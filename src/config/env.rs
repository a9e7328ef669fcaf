//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;
use std::str::FromStr;

use super::{BackendConfig, ConfigError, RunnerConfig};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TRABAS_E2E";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Tunnel URL from TRABAS_E2E_SERVER_URL
    pub server_url: Option<String>,
    /// Client ID from TRABAS_E2E_CLIENT_ID
    pub client_id: Option<String>,
    /// Timeout from TRABAS_E2E_TIMEOUT
    pub timeout: Option<u64>,
    /// Grace period from TRABAS_E2E_GRACE
    pub grace: Option<u64>,
    /// Output format from TRABAS_E2E_FORMAT
    pub format: Option<String>,
    /// Config file from TRABAS_E2E_CONFIG
    pub config_file: Option<String>,
    /// Log level from TRABAS_E2E_LOG_LEVEL
    pub log_level: Option<String>,
    /// Backend host from TRABAS_E2E_BACKEND_HOST
    pub backend_host: Option<String>,
    /// Backend port from TRABAS_E2E_BACKEND_PORT
    pub backend_port: Option<u16>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load through an arbitrary lookup, keyed by the full variable name.
    /// A numeric variable that is set but does not parse is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}_{name}"));

        Ok(Self {
            server_url: get("SERVER_URL"),
            client_id: get("CLIENT_ID"),
            timeout: parse_number(get("TIMEOUT"), "TIMEOUT")?,
            grace: parse_number(get("GRACE"), "GRACE")?,
            format: get("FORMAT"),
            config_file: get("CONFIG"),
            log_level: get("LOG_LEVEL"),
            backend_host: get("BACKEND_HOST"),
            backend_port: parse_number(get("BACKEND_PORT"), "BACKEND_PORT")?,
        })
    }

    /// Overlay runner settings
    pub fn apply_runner(&self, config: &mut RunnerConfig) {
        if let Some(url) = &self.server_url {
            config.server_url = url.clone();
        }
        if let Some(id) = &self.client_id {
            config.client_id = id.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(grace) = self.grace {
            config.grace_secs = grace;
        }
        if let Some(format) = &self.format {
            config.format = format.clone();
        }
    }

    /// Overlay backend settings
    pub fn apply_backend(&self, config: &mut BackendConfig) {
        if let Some(host) = &self.backend_host {
            config.host = host.clone();
        }
        if let Some(port) = self.backend_port {
            config.port = port;
        }
    }
}

fn parse_number<T: FromStr>(value: Option<String>, name: &str) -> Result<Option<T>, ConfigError> {
    value
        .map(|raw| {
            raw.trim().parse().map_err(|_| ConfigError::InvalidEnvValue {
                name: format!("{ENV_PREFIX}_{name}"),
                value: raw,
            })
        })
        .transpose()
}

/// Help text listing all TRABAS_E2E environment variables
pub fn env_help() -> String {
    format!(
        "Environment Variables:\n  \
         {ENV_PREFIX}_SERVER_URL    Tunnel public URL\n  \
         {ENV_PREFIX}_CLIENT_ID     Client ID registered with the tunnel\n  \
         {ENV_PREFIX}_TIMEOUT       Request timeout in seconds\n  \
         {ENV_PREFIX}_GRACE         Startup grace period in seconds\n  \
         {ENV_PREFIX}_FORMAT        Output format (table, json, json-pretty, summary)\n  \
         {ENV_PREFIX}_CONFIG        Path to configuration file\n  \
         {ENV_PREFIX}_LOG_LEVEL     Log level (trace, debug, info, warn, error)\n  \
         {ENV_PREFIX}_BACKEND_HOST  Mock backend bind host\n  \
         {ENV_PREFIX}_BACKEND_PORT  Mock backend bind port"
    )
}
