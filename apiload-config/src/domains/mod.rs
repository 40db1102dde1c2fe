//! Domain-specific configuration modules

pub mod logging;
pub mod results;
pub mod utils;

use crate::error::ConfigResult;
use crate::profile::EnvironmentProfile;
use crate::registry::ProfileRegistry;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main apiload configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApiloadConfig {
    /// Where result files are read from
    #[serde(default)]
    pub results: results::ResultsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Extra environment profiles, keyed by name; replace built-ins of the same name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profiles: BTreeMap<String, EnvironmentProfile>,
}

impl ApiloadConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.results.validate()?;
        self.logging.validate()?;

        for profile in self.named_profiles() {
            profile.validate()?;
        }

        Ok(())
    }

    /// Configured profiles with their names taken from the map keys
    pub fn named_profiles(&self) -> impl Iterator<Item = EnvironmentProfile> + '_ {
        self.profiles.iter().map(|(name, profile)| EnvironmentProfile {
            name: name.clone(),
            ..profile.clone()
        })
    }

    /// Built-in profiles layered with the ones from this configuration
    pub fn profile_registry(&self) -> ConfigResult<ProfileRegistry> {
        ProfileRegistry::builtin()?.with_overrides(self.named_profiles())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let mut config = ApiloadConfig::default();
        if let Ok(registry) = ProfileRegistry::builtin() {
            if let Ok(smoke) = registry.get("smoke") {
                let mut local = smoke.clone();
                local.name = String::new();
                local.base_url = "http://localhost:8080".to_string();
                config.profiles.insert("local".to_string(), local);
            }
        }
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
