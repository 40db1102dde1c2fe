//! Configuration error types

use thiserror::Error;

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading configuration file
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvError(String),

    /// Domain-specific configuration error
    #[error("Domain configuration error in {domain}: {message}")]
    DomainError { domain: String, message: String },

    /// A threshold expression such as `p(95)<500` could not be parsed
    #[error("Invalid threshold '{expression}': {reason}")]
    InvalidThreshold { expression: String, reason: String },

    /// A stage duration such as `1m30s` could not be parsed
    #[error("Invalid duration '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },

    /// The requested environment profile is not registered
    #[error("Unknown environment '{name}'. Available environments: {}", available.join(", "))]
    UnknownEnvironment { name: String, available: Vec<String> },

    /// The requested scenario is not in the catalog
    #[error("Unknown scenario '{name}'. Available scenarios: {}", available.join(", "))]
    UnknownScenario { name: String, available: Vec<String> },
}
