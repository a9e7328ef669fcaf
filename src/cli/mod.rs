//! CLI argument parsing
//!
//! Defines the command-line interfaces of both binaries using clap. Every
//! setting is optional here so that unset flags fall through to the
//! environment, the config file and the defaults.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{env_help, BackendConfig, RunnerConfig};

/// End-to-end verification of a Trabas tunnel deployment
#[derive(Parser, Debug)]
#[command(name = "trabas-e2e")]
#[command(version)]
#[command(about = "Run the tunnel verification scenarios against a Trabas server")]
#[command(after_help = env_help())]
pub struct RunnerArgs {
    /// Public URL of the tunnel server [default: http://localhost:8001]
    #[arg(long)]
    pub server_url: Option<String>,

    /// Client ID the mock backend is registered under [default: e2e-test-client]
    #[arg(long)]
    pub client_id: Option<String>,

    /// Request timeout in seconds [default: 10]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Seconds to wait before the first request [default: 2]
    #[arg(long)]
    pub grace: Option<u64>,

    /// Output format (table, json, json-pretty, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// List the scenarios and exit
    #[arg(long)]
    pub list: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl RunnerArgs {
    /// Overlay explicitly given flags
    pub fn apply(&self, config: &mut RunnerConfig) {
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
        if self.no_color {
            config.color = false;
        }
    }
}

/// Deterministic HTTP backend exposed through the tunnel under test
#[derive(Parser, Debug)]
#[command(name = "mock-backend")]
#[command(version)]
#[command(about = "Serve the fixed endpoint set used by the tunnel scenarios")]
#[command(after_help = env_help())]
pub struct BackendArgs {
    /// Host to bind [default: localhost]
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind [default: 3000]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl BackendArgs {
    pub fn apply(&self, config: &mut BackendConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
    }
}
