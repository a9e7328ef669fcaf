//! trabas-e2e - runs the scenario catalog through a Trabas tunnel

use anyhow::Result;
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing::{error, info};

use trabas_e2e::cli::RunnerArgs;
use trabas_e2e::config::{ConfigFile, EnvConfig, RunnerConfig};
use trabas_e2e::executor::TestRunner;
use trabas_e2e::output::{exit_code, ResultFormatter, ResultReporter};
use trabas_e2e::scenarios::ScenarioCatalog;
use trabas_e2e::utils::logger::{init_logger, use_ansi, LogLevel};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match RunnerArgs::try_parse() {
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
    let color = config.as_ref().map_or(!args.no_color, |c| c.color);
    init_logger(
        LogLevel::resolve(args.verbose, args.log_level.as_deref(), env_level.as_deref()),
        use_ansi(color),
    );

    let catalog = ScenarioCatalog::standard();
    if args.list {
        list_scenarios(&catalog);
        return ExitCode::SUCCESS;
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&config, &catalog).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Defaults, then config file, then environment, then flags
fn resolve_config(args: &RunnerArgs, env: &EnvConfig) -> Result<RunnerConfig> {
    let path = args
        .config
        .clone()
        .or_else(|| env.config_file.as_ref().map(Into::into));
    let mut config = ConfigFile::load_or_default(path.as_deref())?.runner;

    env.apply_runner(&mut config);
    args.apply(&mut config);
    config.validate()?;

    Ok(config)
}

async fn run(config: &RunnerConfig, catalog: &ScenarioCatalog) -> Result<ExitCode> {
    let runner = TestRunner::new(config)?;
    let summary = runner.run(catalog).await;

    let mut formatter = ResultFormatter::new(config.output_format()?);
    if !config.color {
        formatter = formatter.no_color();
    }
    ResultReporter::new(formatter).report(&summary, &mut io::stdout())?;

    Ok(exit_code(&summary))
}

fn list_scenarios(catalog: &ScenarioCatalog) {
    info!("{} scenarios:", catalog.len());
    for (index, scenario) in catalog.iter().enumerate() {
        println!("{:2}. {}", index + 1, scenario);
    }
}
