//! mock-backend - deterministic HTTP server placed behind the tunnel

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, warn};

use trabas_e2e::backend::MockBackend;
use trabas_e2e::cli::BackendArgs;
use trabas_e2e::config::{BackendConfig, ConfigFile, EnvConfig};
use trabas_e2e::utils::logger::{init_logger, use_ansi, LogLevel};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match BackendArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let (config, env_level) = match EnvConfig::load() {
        Ok(env) => (resolve_config(&args, &env), env.log_level),
        Err(e) => (Err(e.into()), None),
    };
    init_logger(
        LogLevel::resolve(args.verbose, args.log_level.as_deref(), env_level.as_deref()),
        use_ansi(true),
    );

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let backend = match MockBackend::bind(&config.host, config.port).await {
        Ok(backend) => backend,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    backend.log_banner();
    backend.serve_with_shutdown(shutdown_signal()).await;

    ExitCode::SUCCESS
}

fn resolve_config(args: &BackendArgs, env: &EnvConfig) -> Result<BackendConfig> {
    let path = args
        .config
        .clone()
        .or_else(|| env.config_file.as_ref().map(Into::into));
    let mut config = ConfigFile::load_or_default(path.as_deref())?.backend;

    env.apply_backend(&mut config);
    args.apply(&mut config);

    Ok(config)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
