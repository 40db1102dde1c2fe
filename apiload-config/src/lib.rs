//! Configuration model for apiload
//!
//! This crate holds the environment profiles the load engine is pointed at,
//! the catalog of load scenarios, the threshold expression grammar, and the
//! application's own configuration (results directory, logging) with
//! validation, defaults and environment variable support.

pub mod error;
pub mod loader;
pub mod profile;
pub mod registry;
pub mod scenario;
pub mod threshold;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use profile::{EnvironmentProfile, Stage, ThresholdMap};
pub use registry::ProfileRegistry;
pub use scenario::{
    Endpoint, EndpointSelection, ExpectedStatus, HttpMethod, Scenario, ScenarioCatalog, ThinkTime,
    API_TAG, TEST_TYPE_TAG,
};
pub use threshold::{Comparator, Statistic, Threshold};
pub use validation::Validatable;

// Re-export domain configurations
pub use domains::{
    logging::{LogFormat, LogLevel, LoggingConfig},
    results::ResultsConfig,
    ApiloadConfig,
};

// Re-export utilities
pub use domains::utils::{format_engine_duration, parse_engine_duration};
