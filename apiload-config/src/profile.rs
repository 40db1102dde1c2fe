//! Environment profiles: target origin, timeout, thresholds and ramp stages

use crate::domains::utils::{format_engine_duration, serde_duration_millis, serde_engine_duration};
use crate::error::ConfigResult;
use crate::threshold::Threshold;
use crate::validation::{
    validate_non_empty, validate_positive, validate_required_string, validate_url, Validatable,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;
use std::time::Duration;

/// Thresholds keyed by metric name
pub type ThresholdMap = BTreeMap<String, Vec<Threshold>>;

/// One segment of the virtual-user ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// How long the ramp towards `target` lasts
    #[serde(with = "serde_engine_duration")]
    pub duration: Duration,

    /// Concurrent virtual users reached at the end of the stage
    pub target: u32,
}

impl Stage {
    pub fn new(duration: Duration, target: u32) -> Self {
        Self { duration, target }
    }

    pub fn secs(seconds: u64, target: u32) -> Self {
        Self::new(Duration::from_secs(seconds), target)
    }

    pub fn mins(minutes: u64, target: u32) -> Self {
        Self::new(Duration::from_secs(minutes * 60), target)
    }

    fn to_engine_json(self) -> JsonValue {
        json!({
            "duration": format_engine_duration(self.duration),
            "target": self.target,
        })
    }
}

/// A named environment the load engine can be pointed at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentProfile {
    /// Profile identifier; taken from the registry key when loaded from a file
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Origin every request of the run is issued against
    pub base_url: String,

    /// Per-request timeout
    #[serde(rename = "timeout_ms", with = "serde_duration_millis")]
    pub timeout: Duration,

    pub thresholds: ThresholdMap,

    pub stages: Vec<Stage>,
}

impl EnvironmentProfile {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
        thresholds: ThresholdMap,
        stages: Vec<Stage>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            timeout,
            thresholds,
            stages,
        }
    }

    /// Length of the whole ramp timeline
    pub fn total_duration(&self) -> Duration {
        total_duration(&self.stages)
    }

    /// Highest virtual-user target of any stage
    pub fn peak_target(&self) -> u32 {
        peak_target(&self.stages)
    }

    /// Planned virtual users `elapsed` into the run
    pub fn target_at(&self, elapsed: Duration) -> u32 {
        target_at(&self.stages, elapsed)
    }

    /// The `(baseUrl, timeout, thresholds, stages)` tuple in the shape the
    /// engine-side scripts import
    pub fn engine_options(&self) -> JsonValue {
        json!({
            "baseUrl": self.base_url,
            "timeout": self.timeout.as_millis() as u64,
            "thresholds": thresholds_to_engine_json(&self.thresholds),
            "stages": stages_to_engine_json(&self.stages),
        })
    }
}

impl Validatable for EnvironmentProfile {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.name, "name", self.domain_name())?;
        validate_url(&self.base_url, "base_url", self.domain_name())?;
        validate_positive(self.timeout.as_millis(), "timeout_ms", self.domain_name())?;
        validate_stages(&self.stages, self.domain_name())?;
        validate_thresholds(&self.thresholds, self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "profile"
    }
}

/// Stages must describe a non-empty timeline of positive-length segments
pub(crate) fn validate_stages(stages: &[Stage], domain: &str) -> ConfigResult<()> {
    validate_non_empty(stages, "stages", domain)?;
    for (index, stage) in stages.iter().enumerate() {
        validate_positive(
            stage.duration.as_millis(),
            &format!("stages[{}].duration", index),
            domain,
        )?;
    }

    stages
        .iter()
        .try_fold(Duration::ZERO, |total, stage| total.checked_add(stage.duration))
        .ok_or_else(|| crate::error::ConfigError::DomainError {
            domain: domain.to_string(),
            message: "stages total duration overflows".to_string(),
        })?;

    Ok(())
}

pub(crate) fn validate_thresholds(thresholds: &ThresholdMap, domain: &str) -> ConfigResult<()> {
    if thresholds.is_empty() {
        return Err(crate::error::ConfigError::DomainError {
            domain: domain.to_string(),
            message: "thresholds must contain at least one entry".to_string(),
        });
    }
    for (metric, expressions) in thresholds {
        validate_required_string(metric, "threshold metric name", domain)?;
        validate_non_empty(expressions, &format!("thresholds.{}", metric), domain)?;
    }
    Ok(())
}

pub(crate) fn total_duration(stages: &[Stage]) -> Duration {
    stages
        .iter()
        .fold(Duration::ZERO, |total, s| total.saturating_add(s.duration))
}

pub(crate) fn peak_target(stages: &[Stage]) -> u32 {
    stages.iter().map(|s| s.target).max().unwrap_or(0)
}

pub(crate) fn target_at(stages: &[Stage], elapsed: Duration) -> u32 {
    let mut start = Duration::ZERO;
    let mut previous = 0u32;

    for stage in stages {
        let end = start.saturating_add(stage.duration);
        if elapsed < end {
            let fraction =
                (elapsed - start).as_secs_f64() / stage.duration.as_secs_f64().max(f64::EPSILON);
            let from = previous as f64;
            let to = stage.target as f64;
            return (from + (to - from) * fraction).round() as u32;
        }
        start = end;
        previous = stage.target;
    }

    0
}

pub(crate) fn stages_to_engine_json(stages: &[Stage]) -> JsonValue {
    JsonValue::Array(stages.iter().map(|s| s.to_engine_json()).collect())
}

pub(crate) fn thresholds_to_engine_json(thresholds: &ThresholdMap) -> JsonValue {
    let map = thresholds
        .iter()
        .map(|(metric, expressions)| {
            let rendered = expressions
                .iter()
                .map(|t| JsonValue::String(t.to_string()))
                .collect();
            (metric.clone(), JsonValue::Array(rendered))
        })
        .collect();
    JsonValue::Object(map)
}
