mod cli;
mod commands;

use anyhow::{Context, Result};
use apiload_config::{ApiloadConfig, ConfigLoader, LogFormat, LoggingConfig, ScenarioCatalog};
use clap::Parser;
use cli::{Cli, Commands, ConfigCommands, ProfileCommands, ScenarioCommands};
use colored::Colorize;
use commands::analyze::{handle_analyze, AnalyzeOptions};
use commands::config::{handle_config_generate, handle_config_show, handle_config_validate};
use commands::profiles::{handle_profiles_export, handle_profiles_list, handle_profiles_show};
use commands::scenarios::{handle_scenarios_export, handle_scenarios_list, handle_scenarios_show};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Load configuration from file or from the environment and defaults
fn load_config(config_path: Option<&PathBuf>) -> Result<ApiloadConfig> {
    let loader = ConfigLoader::new();

    match config_path {
        Some(path) => loader
            .from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => loader
            .from_env()
            .context("Failed to load configuration from environment"),
    }
}

/// Build the log filter: `--log-level`, then `RUST_LOG`, then the configured level
fn build_env_filter(log_level: Option<&String>, config: &LoggingConfig) -> EnvFilter {
    let configured = || EnvFilter::new(config.level.as_str());

    match log_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| {
            eprintln!(
                "Invalid log level '{}', falling back to '{}'",
                level, config.level
            );
            configured()
        }),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| configured()),
    }
}

/// Initialize tracing on stderr so stdout only carries command output
fn init_tracing(log_level: Option<&String>, config: &LoggingConfig) {
    let env_filter = build_env_filter(log_level, config);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    match config.format {
        LogFormat::Text => builder.init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }

    debug!("Tracing initialized");
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_ref())?;
    init_tracing(cli.log_level.as_ref(), &config.logging);
    info!("Configuration loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        None => analyze(&config, &AnalyzeOptions::default(), &mut out),
        Some(Commands::Analyze {
            results_dir,
            extension,
            format,
        }) => {
            let options = AnalyzeOptions {
                results_dir,
                extension,
                format,
            };
            analyze(&config, &options, &mut out)
        }
        Some(Commands::Profiles { profiles_cmd }) => {
            let registry = config
                .profile_registry()
                .context("Failed to build environment profiles")?;
            match profiles_cmd {
                ProfileCommands::List => handle_profiles_list(&mut out, &registry)?,
                ProfileCommands::Show { name, format } => {
                    handle_profiles_show(&mut out, &registry, &name, format)?
                }
                ProfileCommands::Export { name } => {
                    handle_profiles_export(&mut out, &registry, &name)?
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Scenarios { scenarios_cmd }) => {
            let catalog = ScenarioCatalog::builtin().context("Failed to build scenarios")?;
            match scenarios_cmd {
                ScenarioCommands::List => handle_scenarios_list(&mut out, &catalog)?,
                ScenarioCommands::Show { name, format } => {
                    handle_scenarios_show(&mut out, &catalog, &name, format)?
                }
                ScenarioCommands::Export { name } => {
                    handle_scenarios_export(&mut out, &catalog, &name)?
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Config { config_cmd }) => {
            match config_cmd {
                ConfigCommands::Validate { config_file } => {
                    handle_config_validate(&mut out, &config_file)?
                }
                ConfigCommands::Generate { output, force } => {
                    handle_config_generate(&mut out, &output, force)?
                }
                ConfigCommands::Show { format } => handle_config_show(&mut out, &config, format)?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn analyze<W: io::Write>(
    config: &ApiloadConfig,
    options: &AnalyzeOptions,
    out: &mut W,
) -> Result<ExitCode> {
    let found = handle_analyze(&config.results, options, out, &mut io::stderr())?;
    Ok(if found {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
