//! CLI argument parsing definitions

use crate::commands::OutputFormat;
use apiload_results::ReportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "apiload", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Defaults to `analyze` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize every results file in the results directory
    Analyze {
        /// Directory holding the engine's JSON output
        #[arg(long, value_name = "PATH")]
        results_dir: Option<PathBuf>,

        /// Extension of result files, without the dot
        #[arg(long, value_name = "EXT")]
        extension: Option<String>,

        /// Output format: text, json
        #[arg(long, value_name = "FORMAT", default_value = "text")]
        format: ReportFormat,
    },

    /// Inspect environment profiles
    Profiles {
        #[command(subcommand)]
        profiles_cmd: ProfileCommands,
    },

    /// Inspect load scenarios
    Scenarios {
        #[command(subcommand)]
        scenarios_cmd: ScenarioCommands,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// List available profiles
    List,

    /// Show a single profile
    Show {
        /// Profile name
        name: String,

        /// Output format: yaml, json
        #[arg(long, value_name = "FORMAT", default_value = "yaml")]
        format: OutputFormat,
    },

    /// Print a profile's options in the load engine's JSON shape
    Export {
        /// Profile name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ScenarioCommands {
    /// List available scenarios
    List,

    /// Show a single scenario
    Show {
        /// Scenario name
        name: String,

        /// Output format: yaml, json
        #[arg(long, value_name = "FORMAT", default_value = "yaml")]
        format: OutputFormat,
    },

    /// Print a scenario's options in the load engine's JSON shape
    Export {
        /// Scenario name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,
    },

    /// Generate a sample configuration file
    Generate {
        /// Output file path
        #[arg(long, value_name = "PATH")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration in use
    Show {
        /// Output format: yaml, json
        #[arg(long, value_name = "FORMAT", default_value = "yaml")]
        format: OutputFormat,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["apiload"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_analyze_arguments() {
        let cli = Cli::try_parse_from([
            "apiload",
            "analyze",
            "--results-dir",
            "out",
            "--format",
            "json",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Some(Commands::Analyze {
                results_dir,
                extension,
                format,
            }) => {
                assert_eq!(results_dir, Some(PathBuf::from("out")));
                assert_eq!(extension, None);
                assert_eq!(format, ReportFormat::Json);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_invalid_format_is_a_usage_error() {
        assert!(Cli::try_parse_from(["apiload", "analyze", "--format", "xml"]).is_err());
        assert!(Cli::try_parse_from(["apiload", "profiles", "show", "smoke", "--format", "toml"]).is_err());
    }

    #[test]
    fn test_profiles_show() {
        let cli = Cli::try_parse_from(["apiload", "--config", "apiload.yaml", "profiles", "show", "staging"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("apiload.yaml")));
        match cli.command {
            Some(Commands::Profiles {
                profiles_cmd: ProfileCommands::Show { name, format },
            }) => {
                assert_eq!(name, "staging");
                assert_eq!(format, OutputFormat::Yaml);
            }
            _ => panic!("expected profiles show"),
        }
    }
}
