//! Pass/fail threshold expressions
//!
//! A threshold is written the way the load engine expects it, for example
//! `p(95)<500` or `rate<0.05`, and parsed into a
//! `(statistic, comparator, bound)` triple.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Statistic of a metric that a threshold constrains
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statistic {
    Avg,
    Min,
    Max,
    Med,
    Count,
    Rate,
    Value,
    /// Percentile in the range 0..=100
    Percentile(f64),
}

/// Comparison operator of a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

/// A parsed threshold expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub statistic: Statistic,
    pub comparator: Comparator,
    pub bound: f64,
}

impl Threshold {
    pub fn new(statistic: Statistic, comparator: Comparator, bound: f64) -> Self {
        Self {
            statistic,
            comparator,
            bound,
        }
    }

    /// Whether an observed statistic value satisfies this threshold
    pub fn is_satisfied_by(&self, actual: f64) -> bool {
        self.comparator.holds(actual, self.bound)
    }
}

impl Comparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
            Comparator::Eq => "==",
            Comparator::Ne => "!=",
        }
    }

    /// Evaluate `actual <op> bound`
    pub fn holds(&self, actual: f64, bound: f64) -> bool {
        match self {
            Comparator::Lt => actual < bound,
            Comparator::Le => actual <= bound,
            Comparator::Gt => actual > bound,
            Comparator::Ge => actual >= bound,
            Comparator::Eq => actual == bound,
            Comparator::Ne => actual != bound,
        }
    }
}

impl FromStr for Comparator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(Comparator::Lt),
            "<=" => Ok(Comparator::Le),
            ">" => Ok(Comparator::Gt),
            ">=" => Ok(Comparator::Ge),
            "==" => Ok(Comparator::Eq),
            "!=" => Ok(Comparator::Ne),
            _ => Err(format!("unknown comparator '{}'", s)),
        }
    }
}

impl FromStr for Statistic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "avg" => return Ok(Statistic::Avg),
            "min" => return Ok(Statistic::Min),
            "max" => return Ok(Statistic::Max),
            "med" => return Ok(Statistic::Med),
            "count" => return Ok(Statistic::Count),
            "rate" => return Ok(Statistic::Rate),
            "value" => return Ok(Statistic::Value),
            _ => {}
        }

        let inner = s
            .strip_prefix("p(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| format!("unknown statistic '{}'", s))?;

        let percentile: f64 = inner
            .trim()
            .parse()
            .map_err(|_| format!("percentile '{}' is not a number", inner))?;

        if !(0.0..=100.0).contains(&percentile) {
            return Err(format!("percentile {} is outside 0..=100", percentile));
        }

        Ok(Statistic::Percentile(percentile))
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Avg => f.write_str("avg"),
            Statistic::Min => f.write_str("min"),
            Statistic::Max => f.write_str("max"),
            Statistic::Med => f.write_str("med"),
            Statistic::Count => f.write_str("count"),
            Statistic::Rate => f.write_str("rate"),
            Statistic::Value => f.write_str("value"),
            Statistic::Percentile(p) => write!(f, "p({})", p),
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.statistic, self.comparator.as_str(), self.bound)
    }
}

impl FromStr for Threshold {
    type Err = ConfigError;

    fn from_str(expression: &str) -> ConfigResult<Self> {
        let invalid = |reason: String| ConfigError::InvalidThreshold {
            expression: expression.to_string(),
            reason,
        };

        let op_start = expression
            .find(['<', '>', '=', '!'])
            .ok_or_else(|| invalid("missing comparator".to_string()))?;
        let op_len = expression[op_start..]
            .chars()
            .take_while(|c| matches!(c, '<' | '>' | '=' | '!'))
            .count();

        let statistic: Statistic = expression[..op_start].parse().map_err(invalid)?;
        let comparator: Comparator = expression[op_start..op_start + op_len]
            .parse()
            .map_err(invalid)?;

        let bound_text = expression[op_start + op_len..].trim();
        let bound: f64 = bound_text
            .parse()
            .map_err(|_| invalid(format!("bound '{}' is not a number", bound_text)))?;
        if !bound.is_finite() {
            return Err(invalid("bound must be finite".to_string()));
        }

        Ok(Threshold::new(statistic, comparator, bound))
    }
}

impl Serialize for Threshold {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Threshold {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let expression = String::deserialize(deserializer)?;
        expression.parse().map_err(serde::de::Error::custom)
    }
}
