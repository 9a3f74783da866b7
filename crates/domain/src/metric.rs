use serde::{Deserialize, Serialize};
use std::fmt;

/// A KPI value as published by the producer.
///
/// Most KPIs are numbers, but the producer may emit a placeholder string
/// (for example `"n/a"`) when a figure cannot be computed. Text values are
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    /// Numeric value.
    Number(f64),
    /// Non-numeric placeholder.
    Text(String),
}

impl Metric {
    /// Returns the numeric value, if any.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    /// Multiplies a numeric value by `factor`; text is returned as is.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        match self {
            Self::Number(v) => Self::Number(v * factor),
            Self::Text(s) => Self::Text(s.clone()),
        }
    }
}

impl Default for Metric {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

impl From<f64> for Metric {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Metric {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_deserializes_number_and_text() {
        let n: Metric = serde_json::from_str("12.5").unwrap();
        let t: Metric = serde_json::from_str("\"n/a\"").unwrap();
        let i: Metric = serde_json::from_str("42").unwrap();

        assert_eq!(n, Metric::Number(12.5));
        assert_eq!(t, Metric::Text("n/a".to_string()));
        assert_eq!(i.as_f64(), Some(42.0));
    }

    #[test]
    fn test_metric_scaled_leaves_text_alone() {
        assert_eq!(Metric::from(0.25).scaled(100.0).as_f64(), Some(25.0));
        assert_eq!(Metric::from("n/a").scaled(100.0), Metric::from("n/a"));
    }
}
