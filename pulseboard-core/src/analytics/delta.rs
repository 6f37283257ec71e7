//! Null-safe period-over-period percentage change.

use crate::types::MetricMap;

/// Percentage change from `previous` to `current`.
///
/// `None` when either side is missing, the previous value is zero, or the
/// result would not be finite. Never NaN or infinity.
pub fn percent_change(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    match (current, previous) {
        (Some(cur), Some(prev)) if prev != 0.0 => {
            let change = (cur - prev) / prev * 100.0;
            change.is_finite().then_some(change)
        }
        _ => None,
    }
}

/// Change for every key present in `current`.
///
/// Keys only present in `previous` are not reported.
pub fn compute_change(current: &MetricMap, previous: &MetricMap) -> MetricMap {
    current
        .iter()
        .map(|(key, cur)| {
            let prev = previous.get(key).copied().flatten();
            (key.clone(), percent_change(*cur, prev))
        })
        .collect()
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
