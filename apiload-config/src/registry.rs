//! Registry of named environment profiles
//!
//! The registry is built once at start-up, validated as a whole, and then
//! only handed out by reference. There is no way to mutate it; layering
//! user-defined profiles on top produces a new registry.

use crate::error::{ConfigError, ConfigResult};
use crate::profile::{EnvironmentProfile, Stage};
use crate::scenario::threshold_map;
use crate::validation::Validatable;
use std::collections::BTreeMap;
use std::time::Duration;

/// Request timeout shared by every built-in profile
const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, EnvironmentProfile>,
}

impl ProfileRegistry {
    /// Build a registry, validating every profile before it is accepted
    pub fn from_profiles(
        profiles: impl IntoIterator<Item = EnvironmentProfile>,
    ) -> ConfigResult<Self> {
        let mut map = BTreeMap::new();
        for profile in profiles {
            profile.validate()?;
            if map.contains_key(&profile.name) {
                return Err(ConfigError::ValidationError(format!(
                    "environment '{}' is defined twice",
                    profile.name
                )));
            }
            map.insert(profile.name.clone(), profile);
        }
        Ok(Self { profiles: map })
    }

    /// The compiled-in environments
    pub fn builtin() -> ConfigResult<Self> {
        Self::from_profiles(builtin_profiles()?)
    }

    /// A new registry in which `overrides` replace or extend this one's profiles
    pub fn with_overrides(
        &self,
        overrides: impl IntoIterator<Item = EnvironmentProfile>,
    ) -> ConfigResult<Self> {
        let mut profiles = self.profiles.clone();
        for profile in overrides {
            profile.validate()?;
            if profiles.contains_key(&profile.name) {
                log::info!("Environment '{}' overridden by configuration", profile.name);
            }
            profiles.insert(profile.name.clone(), profile);
        }
        Ok(Self { profiles })
    }

    /// Look up a profile by name
    pub fn get(&self, name: &str) -> ConfigResult<&EnvironmentProfile> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownEnvironment {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnvironmentProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn builtin_profiles() -> ConfigResult<Vec<EnvironmentProfile>> {
    Ok(vec![
        EnvironmentProfile::new(
            "development",
            "https://jsonplaceholder.typicode.com",
            DEFAULT_TIMEOUT,
            threshold_map(&[
                ("http_req_duration", &["p(95)<500"]),
                ("http_req_failed", &["rate<0.05"]),
                ("http_reqs", &["rate>10"]),
            ])?,
            vec![Stage::mins(1, 10), Stage::mins(2, 10), Stage::mins(1, 0)],
        ),
        EnvironmentProfile::new(
            "staging",
            "https://httpbin.org",
            DEFAULT_TIMEOUT,
            threshold_map(&[
                ("http_req_duration", &["p(95)<1000"]),
                ("http_req_failed", &["rate<0.1"]),
                ("http_reqs", &["rate>50"]),
            ])?,
            vec![Stage::mins(2, 50), Stage::mins(5, 50), Stage::mins(2, 0)],
        ),
        EnvironmentProfile::new(
            "production",
            "https://reqres.in/api",
            DEFAULT_TIMEOUT,
            threshold_map(&[
                ("http_req_duration", &["p(95)<2000"]),
                ("http_req_failed", &["rate<0.01"]),
                ("http_reqs", &["rate>100"]),
            ])?,
            vec![Stage::mins(5, 100), Stage::mins(10, 100), Stage::mins(5, 0)],
        ),
        EnvironmentProfile::new(
            "smoke",
            "https://catfact.ninja",
            DEFAULT_TIMEOUT,
            threshold_map(&[
                ("http_req_duration", &["p(95)<2000"]),
                ("http_req_failed", &["rate<0.01"]),
            ])?,
            vec![Stage::secs(30, 1), Stage::secs(30, 1), Stage::secs(30, 0)],
        ),
        EnvironmentProfile::new(
            "stress",
            "https://httpbin.org",
            DEFAULT_TIMEOUT,
            threshold_map(&[
                ("http_req_duration", &["p(95)<5000"]),
                ("http_req_failed", &["rate<0.2"]),
            ])?,
            vec![
                Stage::mins(2, 100),
                Stage::mins(5, 200),
                Stage::mins(2, 300),
                Stage::mins(5, 300),
                Stage::mins(2, 200),
                Stage::mins(5, 100),
                Stage::mins(2, 0),
            ],
        ),
        EnvironmentProfile::new(
            "spike",
            "https://jsonplaceholder.typicode.com",
            DEFAULT_TIMEOUT,
            threshold_map(&[
                ("http_req_duration", &["p(95)<10000"]),
                ("http_req_failed", &["rate<0.5"]),
            ])?,
            vec![
                Stage::mins(1, 10),
                Stage::secs(30, 500),
                Stage::mins(1, 10),
                Stage::secs(30, 0),
            ],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILTIN_NAMES: [&str; 6] = [
        "development",
        "production",
        "smoke",
        "spike",
        "staging",
        "stress",
    ];

    #[test]
    fn test_builtin_profiles_are_complete() {
        let registry = ProfileRegistry::builtin().unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), BUILTIN_NAMES);

        for name in BUILTIN_NAMES {
            let profile = registry.get(name).unwrap();
            assert_eq!(profile.name, name);
            assert!(!profile.stages.is_empty());
            assert!(!profile.thresholds.is_empty());
            assert_eq!(profile.timeout, DEFAULT_TIMEOUT);
        }
    }

    #[test]
    fn test_unknown_environment() {
        let registry = ProfileRegistry::builtin().unwrap();
        let err = registry.get("qa").unwrap_err();

        match err {
            ConfigError::UnknownEnvironment { name, available } => {
                assert_eq!(name, "qa");
                assert_eq!(available, BUILTIN_NAMES);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_profile_fails_construction() {
        let registry = ProfileRegistry::builtin().unwrap();
        let mut broken = registry.get("smoke").unwrap().clone();
        broken.name = "broken".to_string();
        broken.stages.clear();

        assert!(ProfileRegistry::from_profiles(vec![broken.clone()]).is_err());
        assert!(registry.with_overrides(vec![broken]).is_err());
    }

    #[test]
    fn test_duplicate_profile_names_are_rejected() {
        let registry = ProfileRegistry::builtin().unwrap();
        let smoke = registry.get("smoke").unwrap().clone();
        assert!(ProfileRegistry::from_profiles(vec![smoke.clone(), smoke]).is_err());
    }

    #[test]
    fn test_overrides_produce_a_new_registry() {
        let registry = ProfileRegistry::builtin().unwrap();

        let mut local = registry.get("development").unwrap().clone();
        local.name = "local".to_string();
        local.base_url = "http://localhost:8080".to_string();

        let mut faster_smoke = registry.get("smoke").unwrap().clone();
        faster_smoke.stages = vec![Stage::secs(10, 1)];

        let layered = registry.with_overrides(vec![local, faster_smoke]).unwrap();

        assert_eq!(layered.len(), 7);
        assert_eq!(layered.get("local").unwrap().base_url, "http://localhost:8080");
        assert_eq!(layered.get("smoke").unwrap().stages.len(), 1);

        // the base registry is untouched
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.get("smoke").unwrap().stages.len(), 3);
        assert!(!registry.contains("local"));
    }

    #[test]
    fn test_spike_profile_timeline() {
        let registry = ProfileRegistry::builtin().unwrap();
        let spike = registry.get("spike").unwrap();
        assert_eq!(spike.peak_target(), 500);
        assert_eq!(spike.total_duration(), Duration::from_secs(180));
        assert_eq!(spike.target_at(Duration::from_secs(75)), 255);
    }
}
