//! Classification of single NDJSON lines from the load engine's JSON output

use apiload_config::TEST_TYPE_TAG;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

/// Record kind that carries a metric sample
pub const POINT_RECORD: &str = "Point";

/// One metric observation extracted from a `Point` record
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub metric: String,
    pub value: f64,
    /// `testType` tag, when present as a non-empty string
    pub test_type: Option<String>,
}

/// Why a line contributed nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Not valid UTF-8
    Encoding,
    /// Not a JSON object with a string `type`
    InvalidJson(String),
    /// A `Point` record without `metric`
    MissingMetric,
    /// A `Point` record without a numeric `data.value`
    InvalidValue(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Encoding => f.write_str("line is not valid UTF-8"),
            SkipReason::InvalidJson(e) => write!(f, "invalid record: {}", e),
            SkipReason::MissingMetric => f.write_str("point record has no metric name"),
            SkipReason::InvalidValue(e) => write!(f, "point record has no numeric value: {}", e),
        }
    }
}

/// Result of classifying one line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// A usable metric sample
    Sample(Sample),
    /// A well-formed record of a kind that carries no sample (`Metric`, ...)
    Ignored,
    /// A malformed line
    Skipped(SkipReason),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    metric: Option<String>,
    #[serde(default)]
    data: Option<JsonValue>,
}

#[derive(Deserialize)]
struct PointData {
    value: f64,
    #[serde(default)]
    tags: Option<BTreeMap<String, JsonValue>>,
}

/// Classify a line of raw bytes, rejecting invalid UTF-8
pub fn parse_line_bytes(line: &[u8]) -> LineOutcome {
    match std::str::from_utf8(line) {
        Ok(text) => parse_line(text),
        Err(_) => LineOutcome::Skipped(SkipReason::Encoding),
    }
}

/// Classify a single line of engine output
pub fn parse_line(line: &str) -> LineOutcome {
    let envelope: Envelope = match serde_json::from_str(line) {
        Ok(envelope) => envelope,
        Err(e) => return LineOutcome::Skipped(SkipReason::InvalidJson(e.to_string())),
    };

    if envelope.kind != POINT_RECORD {
        return LineOutcome::Ignored;
    }

    let metric = match envelope.metric {
        Some(metric) if !metric.is_empty() => metric,
        _ => return LineOutcome::Skipped(SkipReason::MissingMetric),
    };

    let data = envelope.data.unwrap_or(JsonValue::Null);
    let point: PointData = match serde_json::from_value(data) {
        Ok(point) => point,
        Err(e) => return LineOutcome::Skipped(SkipReason::InvalidValue(e.to_string())),
    };

    let test_type = point
        .tags
        .as_ref()
        .and_then(|tags| tags.get(TEST_TYPE_TAG))
        .and_then(JsonValue::as_str)
        .filter(|test_type| !test_type.is_empty())
        .map(str::to_string);

    LineOutcome::Sample(Sample {
        metric,
        value: point.value,
        test_type,
    })
}
