//! Bivariate statistics for exploratory charts.
//!
//! Pearson correlation and least-squares regression over two metric series
//! pulled from row-level data. Degenerate input (fewer than two points,
//! zero variance) resolves to `0` instead of NaN.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::coerce_metric;

/// One row of the denormalized metric table (one per date and channel).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationRow {
    pub date: NaiveDate,
    pub channel: String,
    #[serde(default)]
    pub channel_name: Option<String>,
    /// Metric columns keyed by metric name
    #[serde(flatten)]
    pub metrics: BTreeMap<String, serde_json::Value>,
}

impl CorrelationRow {
    pub fn value(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).and_then(coerce_metric)
    }
}

/// Strength band of `|r|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
    None,
}

impl Strength {
    pub fn from_r(r: f64) -> Self {
        let magnitude = r.abs();
        if magnitude >= 0.8 {
            Strength::VeryStrong
        } else if magnitude >= 0.6 {
            Strength::Strong
        } else if magnitude >= 0.4 {
            Strength::Moderate
        } else if magnitude >= 0.2 {
            Strength::Weak
        } else {
            Strength::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::VeryStrong => "very strong",
            Strength::Strong => "strong",
            Strength::Moderate => "moderate",
            Strength::Weak => "weak",
            Strength::None => "none",
        }
    }
}

/// Qualitative reading of a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interpretation {
    pub strength: Strength,
    pub positive: bool,
}

impl Interpretation {
    pub fn from_r(r: f64) -> Self {
        Self {
            strength: Strength::from_r(r),
            positive: r >= 0.0,
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.strength {
            Strength::None => f.write_str("no correlation"),
            strength => {
                let sign = if self.positive { "positive" } else { "negative" };
                write!(f, "{} {}", strength.as_str(), sign)
            }
        }
    }
}

impl Serialize for Interpretation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of correlating two series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationResult {
    pub r: f64,
    pub r_squared: f64,
    pub n: usize,
    pub slope: f64,
    pub intercept: f64,
    pub interpretation: Interpretation,
}

/// Paired series of the rows where both metrics are finite numbers.
pub fn extract_series(rows: &[CorrelationRow], x_key: &str, y_key: &str) -> (Vec<f64>, Vec<f64>) {
    rows.iter()
        .filter_map(|row| Some((row.value(x_key)?, row.value(y_key)?)))
        .unzip()
}

/// Pearson correlation coefficient; `0` for degenerate input.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x > 0.0 && var_y > 0.0 {
        let r = cov / (var_x * var_y).sqrt();
        if r.is_finite() {
            r.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    } else {
        0.0
    }
}

/// Least-squares fit `y = slope * x + intercept`.
///
/// A vertical or empty sample yields `slope = 0` and `intercept = mean(y)`.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> (f64, f64) {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return (0.0, 0.0);
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let nf = n as f64;

    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();
    let sum_x2: f64 = xs.iter().map(|x| x * x).sum();

    let denominator = nf * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 || !denominator.is_finite() {
        return (0.0, sum_y / nf);
    }

    let slope = (nf * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / nf;
    (slope, intercept)
}

/// Correlate two series, dropping pairs where either value is not finite.
///
/// Series of unequal length are paired up to the shorter one.
pub fn correlate(xs: &[f64], ys: &[f64]) -> CorrelationResult {
    let (xs, ys): (Vec<f64>, Vec<f64>) = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, y)| (*x, *y))
        .unzip();

    let r = pearson(&xs, &ys);
    let (slope, intercept) = linear_regression(&xs, &ys);

    CorrelationResult {
        r,
        r_squared: r * r,
        n: xs.len(),
        slope,
        intercept,
        interpretation: Interpretation::from_r(r),
    }
}

/// Correlate two metric columns of a row-level dataset.
pub fn correlate_rows(rows: &[CorrelationRow], x_key: &str, y_key: &str) -> CorrelationResult {
    let (xs, ys) = extract_series(rows, x_key, y_key);
    let result = correlate(&xs, &ys);
    tracing::debug!(
        x = x_key,
        y = y_key,
        rows = rows.len(),
        n = result.n,
        r = result.r,
        "Computed correlation"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_perfect_positive_line() {
        let result = correlate(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(result.r, 1.0);
        assert_eq!(result.r_squared, 1.0);
        assert_eq!(result.n, 5);
        assert_eq!(result.slope, 2.0);
        assert_eq!(result.intercept, 0.0);
        assert_eq!(result.interpretation.to_string(), "very strong positive");
    }

    #[test]
    fn test_correlation_is_symmetric_but_regression_is_not() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [3.0, 5.0, 7.0, 9.0, 11.0];
        let forward = correlate(&xs, &ys);
        let backward = correlate(&ys, &xs);

        assert_eq!(forward.r, backward.r);
        assert_eq!(forward.slope, 2.0);
        assert_eq!(forward.intercept, 1.0);
        assert_eq!(backward.slope, 0.5);
        assert_eq!(backward.intercept, -0.5);
        assert_ne!(forward.slope, backward.slope);
        assert_ne!(forward.intercept, backward.intercept);

        let noisy_x = [1.0, 4.0, 2.0, 8.0, 5.0, 7.0];
        let noisy_y = [10.0, 3.0, 7.0, 1.0, 6.0, 2.0];
        assert_eq!(pearson(&noisy_x, &noisy_y), pearson(&noisy_y, &noisy_x));
    }

    #[test]
    fn test_degenerate_inputs() {
        let empty = correlate(&[], &[]);
        assert_eq!((empty.r, empty.r_squared, empty.n), (0.0, 0.0, 0));
        assert_eq!((empty.slope, empty.intercept), (0.0, 0.0));

        let single = correlate(&[3.0], &[7.0]);
        assert_eq!(single.r, 0.0);
        assert_eq!(single.slope, 0.0);
        assert_eq!(single.intercept, 7.0);

        let flat_y = correlate(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]);
        assert_eq!(flat_y.r, 0.0);
        assert_eq!(flat_y.r_squared, 0.0);
        assert_eq!(flat_y.slope, 0.0);
        assert_eq!(flat_y.interpretation.to_string(), "no correlation");

        let flat_x = correlate(&[2.0, 2.0, 2.0], &[1.0, 5.0, 9.0]);
        assert_eq!(flat_x.r, 0.0);
        assert_eq!(flat_x.slope, 0.0);
        assert_eq!(flat_x.intercept, 5.0);
    }

    #[test]
    fn test_non_finite_pairs_are_dropped() {
        let result = correlate(&[1.0, f64::NAN, 2.0, 3.0], &[2.0, 5.0, f64::INFINITY, 6.0]);
        assert_eq!(result.n, 2);
        assert_eq!(result.r, 1.0);
    }

    #[test]
    fn test_interpretation_bands() {
        let cases = [
            (0.85, "very strong positive"),
            (-0.8, "very strong negative"),
            (0.6, "strong positive"),
            (-0.45, "moderate negative"),
            (0.2, "weak positive"),
            (-0.19, "no correlation"),
            (0.0, "no correlation"),
        ];
        for (r, expected) in cases {
            assert_eq!(Interpretation::from_r(r).to_string(), expected, "r = {}", r);
        }
    }

    #[test]
    fn test_rows_extraction_skips_incomplete_rows() {
        let rows: Vec<CorrelationRow> = serde_json::from_value(json!([
            {"date": "2024-03-11", "channel": "YOUTUBE", "channelName": "Main", "views": 100, "likes": 10},
            {"date": "2024-03-12", "channel": "YOUTUBE", "views": 200, "likes": "20"},
            {"date": "2024-03-13", "channel": "YOUTUBE", "views": null, "likes": 5},
            {"date": "2024-03-14", "channel": "YOUTUBE", "views": 300, "likes": "n/a"},
            {"date": "2024-03-15", "channel": "YOUTUBE", "views": 400, "likes": 40}
        ]))
        .unwrap();

        let (xs, ys) = extract_series(&rows, "views", "likes");
        assert_eq!(xs, vec![100.0, 200.0, 400.0]);
        assert_eq!(ys, vec![10.0, 20.0, 40.0]);

        let result = correlate_rows(&rows, "views", "likes");
        assert_eq!(result.n, 3);
        assert_eq!(result.interpretation.strength, Strength::VeryStrong);

        let missing = correlate_rows(&rows, "views", "shares");
        assert_eq!(missing.n, 0);
        assert_eq!(missing.r, 0.0);
    }

    #[test]
    fn test_result_serializes_interpretation_as_text() {
        let json = serde_json::to_value(correlate(&[1.0, 2.0], &[2.0, 1.0])).unwrap();
        assert_eq!(json["interpretation"], "very strong negative");
        assert_eq!(json["rSquared"], 1.0);
    }
}
