//! Logging utilities
//!
//! Installs the tracing subscriber shared by both binaries.

use std::io::IsTerminal;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Log level configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    /// Resolve the effective level; `--verbose` wins over everything
    pub fn resolve(verbose: bool, flag: Option<&str>, env: Option<&str>) -> Self {
        if verbose {
            return LogLevel::Debug;
        }
        flag.or(env)
            .and_then(Self::from_str)
            .unwrap_or_default()
    }

    fn directives(self) -> String {
        let level = self.to_tracing_level().as_str().to_lowercase();
        format!("trabas_e2e={level},mock_backend={level}")
    }
}

/// Color log lines only when asked to and stderr is a terminal
pub fn use_ansi(color: bool) -> bool {
    color && std::io::stderr().is_terminal()
}

/// Initialize the logger on stderr; `RUST_LOG` takes precedence when set.
/// Stdout stays reserved for the report.
pub fn init_logger(level: LogLevel, ansi: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directives()));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .compact()
        .try_init();
}
