//! Results directory configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the load engine's NDJSON output is picked up from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsConfig {
    /// Directory scanned (non-recursively) for result files
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// File extension of result files, without the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            extension: default_extension(),
        }
    }
}

impl Validatable for ResultsConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.directory.as_os_str().is_empty() {
            return Err(self.validation_error("directory cannot be empty"));
        }

        validate_required_string(&self.extension, "extension", self.domain_name())?;
        if self.extension.starts_with('.') {
            return Err(self.validation_error(format!(
                "extension '{}' must not start with a dot",
                self.extension
            )));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "results"
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("results")
}

fn default_extension() -> String {
    "json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_config_defaults() {
        let config = ResultsConfig::default();
        assert_eq!(config.directory, PathBuf::from("results"));
        assert_eq!(config.extension, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_results_config_validation() {
        let mut config = ResultsConfig::default();
        config.extension = ".json".to_string();
        assert!(config.validate().is_err());

        config.extension = String::new();
        assert!(config.validate().is_err());

        let config = ResultsConfig {
            directory: PathBuf::new(),
            ..ResultsConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
