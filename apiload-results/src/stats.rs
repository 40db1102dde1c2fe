//! Summary statistics over the samples of one metric

use serde::Serialize;

/// Count, sum, extremes and mean of a series of samples
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SummaryStats {
    pub count: u64,
    pub sum: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl SummaryStats {
    /// Summarize `values` in order; every field is empty for an empty slice
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let sum: f64 = values.iter().sum();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let count = values.len() as u64;

        Self {
            count,
            sum,
            min: Some(min),
            max: Some(max),
            mean: Some(sum / count as f64),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// `sum / count` as a percentage, 0 when `count` is 0
    pub fn sum_percentage_of(&self, denominator: u64) -> f64 {
        percentage(self.sum, denominator)
    }
}

/// `numerator / denominator * 100`, 0 when the denominator is 0
pub fn percentage(numerator: f64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series() {
        let stats = SummaryStats::from_values(&[]);
        assert!(stats.is_empty());
        assert_eq!(stats.sum, 0.0);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.min, None);
    }

    #[test]
    fn test_literal_extremes_and_mean() {
        let stats = SummaryStats::from_values(&[120.0, 80.0, 100.0, 300.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.sum, 600.0);
        assert_eq!(stats.min, Some(80.0));
        assert_eq!(stats.max, Some(300.0));
        assert_eq!(stats.mean, Some(150.0));
    }

    #[test]
    fn test_percentage_guards_zero_denominator() {
        assert_eq!(percentage(5.0, 0), 0.0);
        assert_eq!(percentage(5.0, 50), 10.0);
        assert_eq!(SummaryStats::from_values(&[1.0, 0.0]).sum_percentage_of(4), 25.0);
    }
}
