//! Scenario catalog: the declarative half of each load scenario
//!
//! A scenario carries everything the engine-side script declares up front
//! (ramp stages, thresholds, run tags) plus the endpoints it exercises and
//! the inline checks applied to each response. Executing it is the load
//! engine's job.

use crate::domains::utils::serde_duration_millis;
use crate::error::{ConfigError, ConfigResult};
use crate::profile::{
    peak_target, stages_to_engine_json, thresholds_to_engine_json, total_duration,
    validate_stages, validate_thresholds, Stage, ThresholdMap,
};
use crate::threshold::Threshold;
use crate::validation::{
    validate_non_empty, validate_positive, validate_required_string, validate_url, Validatable,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;
use std::time::Duration;

/// Tag the engine attaches to every sample of a run to identify its kind
pub const TEST_TYPE_TAG: &str = "testType";

/// Tag naming the API under test
pub const API_TAG: &str = "api";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Status check applied to each response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedStatus {
    /// Exactly this status code
    Exact(u16),
    /// Any 2xx or 3xx status
    Success,
    /// Any completed response, whatever its status
    AnyResponse,
}

impl ExpectedStatus {
    pub fn matches(&self, status: u16) -> bool {
        match self {
            ExpectedStatus::Exact(code) => status == *code,
            ExpectedStatus::Success => (200..400).contains(&status),
            ExpectedStatus::AnyResponse => status != 0,
        }
    }
}

/// One request of a scenario iteration and the checks on its response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    pub method: HttpMethod,
    pub url: String,
    pub expected_status: ExpectedStatus,

    /// Response-time check bound
    #[serde(rename = "max_duration_ms", with = "serde_duration_millis")]
    pub max_duration: Duration,
}

impl Endpoint {
    pub fn new(
        name: impl Into<String>,
        method: HttpMethod,
        url: impl Into<String>,
        expected_status: ExpectedStatus,
        max_duration: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            method,
            url: url.into(),
            expected_status,
            max_duration,
        }
    }

    pub fn get(name: &str, url: &str, max_duration_ms: u64) -> Self {
        Self::new(
            name,
            HttpMethod::Get,
            url,
            ExpectedStatus::Exact(200),
            Duration::from_millis(max_duration_ms),
        )
    }
}

/// How a virtual user picks endpoints on each iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EndpointSelection {
    /// Every endpoint, in order
    #[default]
    Sequential,
    /// One endpoint chosen uniformly at random
    RandomOne,
}

/// Pause between iterations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThinkTime {
    #[default]
    None,
    Fixed {
        #[serde(rename = "duration_ms", with = "serde_duration_millis")]
        duration: Duration,
    },
    Uniform {
        #[serde(rename = "min_ms", with = "serde_duration_millis")]
        min: Duration,
        #[serde(rename = "max_ms", with = "serde_duration_millis")]
        max: Duration,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: String,

    /// Tags attached to every sample of the run (`testType`, `api`)
    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    pub stages: Vec<Stage>,
    pub thresholds: ThresholdMap,
    pub endpoints: Vec<Endpoint>,

    #[serde(default)]
    pub selection: EndpointSelection,

    #[serde(default)]
    pub think_time: ThinkTime,
}

impl Scenario {
    pub fn test_type(&self) -> Option<&str> {
        self.tags.get(TEST_TYPE_TAG).map(String::as_str)
    }

    pub fn total_duration(&self) -> Duration {
        total_duration(&self.stages)
    }

    pub fn peak_target(&self) -> u32 {
        peak_target(&self.stages)
    }

    /// Script `options` object for the load engine
    pub fn engine_options(&self) -> JsonValue {
        let mut options = json!({
            "stages": stages_to_engine_json(&self.stages),
            "thresholds": thresholds_to_engine_json(&self.thresholds),
        });
        if !self.tags.is_empty() {
            options["tags"] = json!(self.tags);
        }
        options
    }
}

impl Validatable for Scenario {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.name, "name", self.domain_name())?;
        validate_stages(&self.stages, self.domain_name())?;
        validate_thresholds(&self.thresholds, self.domain_name())?;
        validate_non_empty(&self.endpoints, "endpoints", self.domain_name())?;

        for endpoint in &self.endpoints {
            endpoint.validate()?;
        }

        if let ThinkTime::Uniform { min, max } = self.think_time {
            if min > max {
                return Err(self.validation_error(format!(
                    "think_time min ({}ms) exceeds max ({}ms)",
                    min.as_millis(),
                    max.as_millis()
                )));
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "scenario"
    }
}

impl Validatable for Endpoint {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.name, "name", self.domain_name())?;
        validate_url(&self.url, "url", self.domain_name())?;
        validate_positive(
            self.max_duration.as_millis(),
            "max_duration_ms",
            self.domain_name(),
        )?;

        if let ExpectedStatus::Exact(code) = self.expected_status {
            if !(100..=599).contains(&code) {
                return Err(self.validation_error(format!(
                    "expected_status {} is not an HTTP status code",
                    code
                )));
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "scenario.endpoint"
    }
}

/// Immutable, validated set of scenarios
#[derive(Debug, Clone)]
pub struct ScenarioCatalog {
    scenarios: BTreeMap<String, Scenario>,
}

impl ScenarioCatalog {
    /// Build a catalog, validating every scenario up front
    pub fn from_scenarios(scenarios: impl IntoIterator<Item = Scenario>) -> ConfigResult<Self> {
        let mut map = BTreeMap::new();
        for scenario in scenarios {
            scenario.validate()?;
            if map.insert(scenario.name.clone(), scenario).is_some() {
                return Err(ConfigError::ValidationError(
                    "duplicate scenario name in catalog".to_string(),
                ));
            }
        }
        Ok(Self { scenarios: map })
    }

    /// The scenarios shipped with apiload
    pub fn builtin() -> ConfigResult<Self> {
        Self::from_scenarios(builtin_scenarios()?)
    }

    pub fn get(&self, name: &str) -> ConfigResult<&Scenario> {
        self.scenarios
            .get(name)
            .ok_or_else(|| ConfigError::UnknownScenario {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.values()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

pub(crate) fn threshold_map(entries: &[(&str, &[&str])]) -> ConfigResult<ThresholdMap> {
    let mut map = ThresholdMap::new();
    for (metric, expressions) in entries {
        let parsed = expressions
            .iter()
            .map(|e| e.parse::<Threshold>())
            .collect::<ConfigResult<Vec<_>>>()?;
        map.insert(metric.to_string(), parsed);
    }
    Ok(map)
}

fn tags(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

const JSONPLACEHOLDER: &str = "https://jsonplaceholder.typicode.com";
const HTTPBIN: &str = "https://httpbin.org";
const REQRES: &str = "https://reqres.in/api";
const CATFACTS: &str = "https://catfact.ninja";

fn builtin_scenarios() -> ConfigResult<Vec<Scenario>> {
    let comparison_targets: [(&str, &str, &[&str]); 4] = [
        ("jsonplaceholder", JSONPLACEHOLDER, &["/posts", "/users", "/comments", "/todos"]),
        ("httpbin", HTTPBIN, &["/get", "/uuid", "/json", "/headers"]),
        ("reqres", REQRES, &["/users", "/users/2", "/unknown", "/unknown/2"]),
        ("catfacts", CATFACTS, &["/fact", "/breeds", "/facts"]),
    ];
    let comparison_endpoints: Vec<Endpoint> = comparison_targets
        .iter()
        .flat_map(|(api, base, paths)| {
            paths.iter().map(move |path| {
                Endpoint::get(&format!("{}: GET {}", api, path), &format!("{}{}", base, path), 2000)
            })
        })
        .collect();

    Ok(vec![
        Scenario {
            name: "basic".to_string(),
            description: "JSONPlaceholder posts: list, fetch one, create".to_string(),
            tags: BTreeMap::new(),
            stages: vec![Stage::secs(30, 10), Stage::mins(1, 10), Stage::secs(30, 0)],
            thresholds: threshold_map(&[
                ("http_req_duration", &["p(95)<500"]),
                ("http_req_failed", &["rate<0.05"]),
            ])?,
            endpoints: vec![
                Endpoint::get("GET /posts", &format!("{}/posts", JSONPLACEHOLDER), 500),
                Endpoint::get("GET /posts/1", &format!("{}/posts/1", JSONPLACEHOLDER), 300),
                Endpoint::new(
                    "POST /posts",
                    HttpMethod::Post,
                    format!("{}/posts", JSONPLACEHOLDER),
                    ExpectedStatus::Exact(201),
                    Duration::from_millis(1000),
                ),
            ],
            selection: EndpointSelection::Sequential,
            think_time: ThinkTime::Fixed {
                duration: Duration::from_secs(1),
            },
        },
        Scenario {
            name: "smoke".to_string(),
            description: "One virtual user touching every public API once per iteration"
                .to_string(),
            tags: tags(&[(TEST_TYPE_TAG, "smoke"), (API_TAG, "multiple")]),
            stages: vec![Stage::secs(30, 1), Stage::secs(30, 1), Stage::secs(30, 0)],
            thresholds: threshold_map(&[
                ("http_req_duration", &["p(95)<2000"]),
                ("http_req_failed", &["rate<0.01"]),
            ])?,
            endpoints: vec![
                Endpoint::get("JSONPlaceholder", &format!("{}/posts/1", JSONPLACEHOLDER), 2000),
                Endpoint::get("httpbin", &format!("{}/get", HTTPBIN), 2000),
                Endpoint::get("ReqRes", &format!("{}/users/1", REQRES), 2000),
                Endpoint::get("Cat Facts", &format!("{}/fact", CATFACTS), 2000),
            ],
            selection: EndpointSelection::Sequential,
            think_time: ThinkTime::None,
        },
        Scenario {
            name: "load".to_string(),
            description: "Sustained 100-user load across JSONPlaceholder collections".to_string(),
            tags: tags(&[(TEST_TYPE_TAG, "load"), (API_TAG, "jsonplaceholder")]),
            stages: vec![Stage::mins(2, 100), Stage::mins(5, 100), Stage::mins(2, 0)],
            thresholds: threshold_map(&[
                ("http_req_duration", &["p(95)<1000"]),
                ("http_req_failed", &["rate<0.1"]),
                ("http_reqs", &["rate>50"]),
            ])?,
            endpoints: ["/posts", "/comments", "/albums", "/photos", "/todos", "/users"]
                .iter()
                .map(|path| {
                    Endpoint::get(
                        &format!("GET {}", path),
                        &format!("{}{}", JSONPLACEHOLDER, path),
                        1000,
                    )
                })
                .collect(),
            selection: EndpointSelection::RandomOne,
            think_time: ThinkTime::Uniform {
                min: Duration::from_secs(1),
                max: Duration::from_secs(3),
            },
        },
        Scenario {
            name: "stress".to_string(),
            description: "Step up to 300 users against httpbin and back down".to_string(),
            tags: tags(&[(TEST_TYPE_TAG, "stress"), (API_TAG, "httpbin")]),
            stages: vec![
                Stage::mins(2, 100),
                Stage::mins(5, 200),
                Stage::mins(2, 300),
                Stage::mins(5, 300),
                Stage::mins(2, 200),
                Stage::mins(5, 100),
                Stage::mins(2, 0),
            ],
            thresholds: threshold_map(&[
                ("http_req_duration", &["p(95)<5000"]),
                ("http_req_failed", &["rate<0.2"]),
            ])?,
            endpoints: [
                (HttpMethod::Get, "/get"),
                (HttpMethod::Post, "/post"),
                (HttpMethod::Put, "/put"),
                (HttpMethod::Delete, "/delete"),
                (HttpMethod::Get, "/delay/1"),
            ]
            .iter()
            .map(|(method, path)| {
                Endpoint::new(
                    format!("{} {}", method.as_str(), path),
                    *method,
                    format!("{}{}", HTTPBIN, path),
                    ExpectedStatus::Success,
                    Duration::from_millis(5000),
                )
            })
            .collect(),
            selection: EndpointSelection::RandomOne,
            think_time: ThinkTime::Uniform {
                min: Duration::ZERO,
                max: Duration::from_secs(3),
            },
        },
        Scenario {
            name: "spike".to_string(),
            description: "Sudden jump from 10 to 500 users".to_string(),
            tags: tags(&[(TEST_TYPE_TAG, "spike"), (API_TAG, "jsonplaceholder")]),
            stages: vec![
                Stage::mins(1, 10),
                Stage::secs(30, 500),
                Stage::mins(1, 10),
                Stage::secs(30, 0),
            ],
            thresholds: threshold_map(&[
                ("http_req_duration", &["p(95)<10000"]),
                ("http_req_failed", &["rate<0.5"]),
            ])?,
            endpoints: ["/posts", "/users", "/todos"]
                .iter()
                .map(|path| {
                    Endpoint::new(
                        format!("GET {}", path),
                        HttpMethod::Get,
                        format!("{}{}", JSONPLACEHOLDER, path),
                        ExpectedStatus::AnyResponse,
                        Duration::from_millis(10_000),
                    )
                })
                .collect(),
            selection: EndpointSelection::RandomOne,
            think_time: ThinkTime::Fixed {
                duration: Duration::from_millis(100),
            },
        },
        Scenario {
            name: "api-comparison".to_string(),
            description: "Random endpoint of a random public API, compared per api tag"
                .to_string(),
            tags: tags(&[(TEST_TYPE_TAG, "api-comparison")]),
            stages: vec![Stage::mins(1, 20), Stage::mins(3, 20), Stage::mins(1, 0)],
            thresholds: threshold_map(&[
                ("http_req_duration", &["p(95)<2000"]),
                ("http_req_failed", &["rate<0.1"]),
            ])?,
            endpoints: comparison_endpoints,
            selection: EndpointSelection::RandomOne,
            think_time: ThinkTime::Fixed {
                duration: Duration::from_secs(1),
            },
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = ScenarioCatalog::builtin().unwrap();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(
            names,
            vec!["api-comparison", "basic", "load", "smoke", "spike", "stress"]
        );

        for scenario in catalog.iter() {
            assert!(!scenario.stages.is_empty(), "{} has no stages", scenario.name);
            assert!(!scenario.thresholds.is_empty(), "{} has no thresholds", scenario.name);
            assert!(!scenario.endpoints.is_empty(), "{} has no endpoints", scenario.name);
        }
    }

    #[test]
    fn test_scenario_lookup() {
        let catalog = ScenarioCatalog::builtin().unwrap();

        let stress = catalog.get("stress").unwrap();
        assert_eq!(stress.test_type(), Some("stress"));
        assert_eq!(stress.peak_target(), 300);
        assert_eq!(stress.total_duration(), Duration::from_secs(23 * 60));
        assert_eq!(stress.endpoints[3].method, HttpMethod::Delete);

        let err = catalog.get("soak").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownScenario { ref name, .. } if name == "soak"));
    }

    #[test]
    fn test_api_comparison_covers_every_api() {
        let catalog = ScenarioCatalog::builtin().unwrap();
        let scenario = catalog.get("api-comparison").unwrap();
        assert_eq!(scenario.endpoints.len(), 15);
        assert!(scenario.endpoints.iter().any(|e| e.url == "https://catfact.ninja/breeds"));
    }

    #[test]
    fn test_engine_options_include_tags() {
        let catalog = ScenarioCatalog::builtin().unwrap();

        let spike = catalog.get("spike").unwrap().engine_options();
        assert_eq!(spike["tags"]["testType"], "spike");
        assert_eq!(spike["stages"][1]["duration"], "30s");
        assert_eq!(spike["stages"][1]["target"], 500);

        let basic = catalog.get("basic").unwrap().engine_options();
        assert!(basic.get("tags").is_none());
    }

    #[test]
    fn test_expected_status_matching() {
        assert!(ExpectedStatus::Exact(201).matches(201));
        assert!(!ExpectedStatus::Exact(201).matches(200));
        assert!(ExpectedStatus::Success.matches(302));
        assert!(!ExpectedStatus::Success.matches(404));
        assert!(ExpectedStatus::AnyResponse.matches(503));
        assert!(!ExpectedStatus::AnyResponse.matches(0));
    }

    #[test]
    fn test_scenario_validation() {
        let catalog = ScenarioCatalog::builtin().unwrap();
        let mut scenario = catalog.get("smoke").unwrap().clone();

        scenario.endpoints.clear();
        assert!(scenario.validate().is_err());

        let mut scenario = catalog.get("smoke").unwrap().clone();
        scenario.think_time = ThinkTime::Uniform {
            min: Duration::from_secs(3),
            max: Duration::from_secs(1),
        };
        assert!(scenario.validate().is_err());

        let mut scenario = catalog.get("smoke").unwrap().clone();
        scenario.endpoints[0].expected_status = ExpectedStatus::Exact(42);
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let catalog = ScenarioCatalog::builtin().unwrap();
        let smoke = catalog.get("smoke").unwrap().clone();
        assert!(ScenarioCatalog::from_scenarios(vec![smoke.clone(), smoke]).is_err());
    }
}
