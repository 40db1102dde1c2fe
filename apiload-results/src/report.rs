//! Per-file aggregated report and the ratios derived from it

use crate::stats::{percentage, SummaryStats};
use serde::Serialize;
use std::collections::BTreeMap;

/// Metric names the derived values are computed from
pub mod metric_names {
    pub const HTTP_REQS: &str = "http_reqs";
    pub const HTTP_REQ_DURATION: &str = "http_req_duration";
    pub const HTTP_REQ_FAILED: &str = "http_req_failed";
    pub const CHECKS: &str = "checks";
}

/// Label used when no sample in a file carried a test type tag
pub const UNKNOWN_TEST_TYPE: &str = "unknown";

/// Aggregated view of one results file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub file: String,
    pub test_type: String,
    pub total_lines: u64,
    pub skipped_lines: u64,
    pub derived: DerivedMetrics,
    pub metrics: BTreeMap<String, SummaryStats>,
}

/// Headline figures computed from the per-metric statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    /// Sum of `http_reqs` samples
    pub total_requests: f64,
    /// Statistics of `http_req_duration`, in milliseconds
    pub duration: SummaryStats,
    /// Sum of `http_req_failed` over the count of `http_reqs`, as a percentage
    pub failure_rate: f64,
    pub checks: CheckSummary,
}

/// Passed and total checks with the pass rate as a percentage
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CheckSummary {
    pub passed: f64,
    pub total: u64,
    pub pass_rate: f64,
}

impl DerivedMetrics {
    pub fn from_metrics(metrics: &BTreeMap<String, SummaryStats>) -> Self {
        let stat = |name: &str| metrics.get(name).copied().unwrap_or_default();

        let requests = stat(metric_names::HTTP_REQS);
        let failed = stat(metric_names::HTTP_REQ_FAILED);
        let checks = stat(metric_names::CHECKS);

        Self {
            total_requests: requests.sum,
            duration: stat(metric_names::HTTP_REQ_DURATION),
            failure_rate: failed.sum_percentage_of(requests.count),
            checks: CheckSummary {
                passed: checks.sum,
                total: checks.count,
                pass_rate: percentage(checks.sum, checks.count),
            },
        }
    }
}

impl FileReport {
    pub fn new(
        file: impl Into<String>,
        test_type: Option<String>,
        total_lines: u64,
        skipped_lines: u64,
        metrics: BTreeMap<String, SummaryStats>,
    ) -> Self {
        Self {
            file: file.into(),
            test_type: test_type.unwrap_or_else(|| UNKNOWN_TEST_TYPE.to_string()),
            total_lines,
            skipped_lines,
            derived: DerivedMetrics::from_metrics(&metrics),
            metrics,
        }
    }

    /// Statistics of `name`, empty when the metric never appeared
    pub fn metric(&self, name: &str) -> SummaryStats {
        self.metrics.get(name).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(entries: &[(&str, &[f64])]) -> BTreeMap<String, SummaryStats> {
        entries
            .iter()
            .map(|(name, values)| (name.to_string(), SummaryStats::from_values(values)))
            .collect()
    }

    #[test]
    fn test_failure_rate_uses_request_count() {
        let report = FileReport::new(
            "load.json",
            Some("load".to_string()),
            55,
            0,
            metrics(&[
                (metric_names::HTTP_REQS, &[1.0; 50]),
                (metric_names::HTTP_REQ_FAILED, &[1.0; 5]),
            ]),
        );

        assert_eq!(report.derived.total_requests, 50.0);
        assert_eq!(report.derived.failure_rate, 10.0);
    }

    #[test]
    fn test_check_pass_rate() {
        let report = FileReport::new(
            "checks.json",
            None,
            4,
            0,
            metrics(&[(metric_names::CHECKS, &[1.0, 1.0, 1.0, 0.0])]),
        );

        assert_eq!(report.test_type, UNKNOWN_TEST_TYPE);
        assert_eq!(report.derived.checks.passed, 3.0);
        assert_eq!(report.derived.checks.total, 4);
        assert_eq!(report.derived.checks.pass_rate, 75.0);
    }

    #[test]
    fn test_empty_report_has_no_division_by_zero() {
        let report = FileReport::new("empty.json", None, 0, 0, BTreeMap::new());
        assert_eq!(report.derived.total_requests, 0.0);
        assert_eq!(report.derived.failure_rate, 0.0);
        assert_eq!(report.derived.checks.pass_rate, 0.0);
        assert!(report.derived.duration.is_empty());
        assert!(report.metric(metric_names::HTTP_REQS).is_empty());
    }
}
