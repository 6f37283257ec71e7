//! Snapshot aggregation.
//!
//! Collapses many per-connection snapshots into one canonical [`MetricMap`]
//! per window. Raw spellings are resolved through the metric registry and
//! each key is combined with its registered [`Reducer`].
//!
//! Null policy: a null (or non-numeric) leaf contributes nothing. A key that
//! was seen but never carried a number finalizes to `0`, not `null`. Keys
//! that never occur in any snapshot are absent from the result.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, FixedOffset};

use super::metrics_registry::{self, Reducer};
use super::period::PeriodWindow;
use crate::types::{coerce_metric, MetricMap, MetricSnapshot, PeriodType, SnapshotData};

/// Running per-key accumulator for one window.
#[derive(Debug, Default, Clone)]
pub struct MetricAccumulator {
    values: BTreeMap<String, Option<f64>>,
}

impl MetricAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one snapshot payload into the accumulator.
    pub fn absorb(&mut self, data: &SnapshotData) {
        for descriptor in metrics_registry::descriptors() {
            let mut seen = false;
            let mut value = None;
            for alias in descriptor.synonyms {
                if let Some(raw) = data.get(*alias) {
                    seen = true;
                    value = leaf_value(alias, raw);
                    if value.is_some() {
                        break;
                    }
                }
            }
            if seen {
                self.merge(descriptor.key, descriptor.reducer, value);
            }
        }

        for (key, raw) in data {
            if metrics_registry::descriptor_for_alias(key).is_none() {
                self.merge(key, Reducer::Sum, leaf_value(key, raw));
            }
        }
    }

    fn merge(&mut self, key: &str, reducer: Reducer, value: Option<f64>) {
        let slot = self.values.entry(key.to_string()).or_insert(None);
        if let Some(v) = value {
            *slot = Some(match (reducer, *slot) {
                (Reducer::Sum, current) => current.unwrap_or(0.0) + v,
                (Reducer::Max, Some(current)) => current.max(v),
                (Reducer::Max, None) => v,
            });
        }
    }

    /// Finalize into a metric map; all-null keys become `0`.
    pub fn finish(self) -> MetricMap {
        self.values
            .into_iter()
            .map(|(key, value)| (key, Some(value.unwrap_or(0.0))))
            .collect()
    }
}

fn leaf_value(key: &str, raw: &serde_json::Value) -> Option<f64> {
    let value = coerce_metric(raw);
    if value.is_none() && !raw.is_null() {
        tracing::debug!(key, raw = %raw, "Ignoring non-numeric metric value");
    }
    value
}

/// Aggregate snapshots into one metric map.
pub fn aggregate<'a, I>(snapshots: I) -> MetricMap
where
    I: IntoIterator<Item = &'a MetricSnapshot>,
{
    let mut acc = MetricAccumulator::new();
    let mut count = 0usize;
    for snapshot in snapshots {
        acc.absorb(&snapshot.data);
        count += 1;
    }
    let map = acc.finish();
    tracing::debug!(snapshot_count = count, metric_count = map.len(), "Aggregated snapshots");
    map
}

/// Select the snapshots that feed a window `[start, end]`.
///
/// Snapshots of `period_type` and DAILY snapshots whose `period_start` lies
/// in the window are eligible. DAILY snapshots of a connection only roll up
/// when that connection has no `period_type` snapshot in the same window.
pub fn select_snapshots<'a>(
    snapshots: &'a [MetricSnapshot],
    start: &DateTime<FixedOffset>,
    end: &DateTime<FixedOffset>,
    period_type: PeriodType,
) -> Vec<&'a MetricSnapshot> {
    let in_window: Vec<&MetricSnapshot> = snapshots
        .iter()
        .filter(|s| s.period_start >= *start && s.period_start <= *end)
        .filter(|s| s.period_type == period_type || s.period_type == PeriodType::Daily)
        .collect();

    let covered: HashSet<_> = in_window
        .iter()
        .filter(|s| s.period_type == period_type)
        .map(|s| s.connection_key())
        .collect();

    in_window
        .into_iter()
        .filter(|s| {
            s.period_type == period_type
                || (s.period_type == PeriodType::Daily && !covered.contains(&s.connection_key()))
        })
        .collect()
}

/// Snapshots feeding the current window.
pub fn select_current<'a>(
    snapshots: &'a [MetricSnapshot],
    window: &PeriodWindow,
) -> Vec<&'a MetricSnapshot> {
    select_snapshots(snapshots, &window.start, &window.end, window.period_type)
}

/// Snapshots feeding the previous window.
pub fn select_previous<'a>(
    snapshots: &'a [MetricSnapshot],
    window: &PeriodWindow,
) -> Vec<&'a MetricSnapshot> {
    select_snapshots(
        snapshots,
        &window.prev_start,
        &window.prev_end,
        window.period_type,
    )
}
