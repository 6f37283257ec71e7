//! "What changed" highlights.
//!
//! Scans every `(channel, metric, change)` triple, keeps significant changes
//! of labelled metrics, classifies them by metric polarity and returns the
//! largest movers.

use serde::Serialize;

use super::channels::ChannelAggregate;
use super::delta::round1;
use super::metrics_registry::{self, Polarity};
use crate::config::InsightsConfig;
use crate::types::Provider;

/// Default minimum absolute change, in percentage points.
pub const SIGNIFICANCE_THRESHOLD: f64 = 10.0;

/// Hard cap on the number of highlights.
pub const MAX_HIGHLIGHTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Positive,
    Negative,
    Neutral,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Positive => "positive",
            Severity::Negative => "negative",
            Severity::Neutral => "neutral",
        }
    }

    fn classify(polarity: Polarity, direction: Direction) -> Self {
        match (polarity, direction) {
            (Polarity::GoodUp, Direction::Up) | (Polarity::GoodDown, Direction::Down) => {
                Severity::Positive
            }
            (Polarity::GoodUp, Direction::Down) | (Polarity::GoodDown, Direction::Up) => {
                Severity::Negative
            }
            (Polarity::Neutral, _) => Severity::Neutral,
        }
    }
}

/// A ranked, labelled callout of a significant period-over-period change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub channel: Provider,
    /// Display label of the metric
    pub metric: String,
    /// Canonical metric key
    pub metric_key: String,
    /// Percentage change rounded to one decimal
    pub change: f64,
    pub direction: Direction,
    pub severity: Severity,
}

/// Ranks channel deltas into highlights.
#[derive(Debug, Clone)]
pub struct HighlightRanker {
    threshold: f64,
    limit: usize,
}

impl Default for HighlightRanker {
    fn default() -> Self {
        Self::new(SIGNIFICANCE_THRESHOLD, MAX_HIGHLIGHTS)
    }
}

impl HighlightRanker {
    /// Create a ranker; `limit` is clamped to [`MAX_HIGHLIGHTS`].
    pub fn new(threshold: f64, limit: usize) -> Self {
        Self {
            threshold,
            limit: limit.min(MAX_HIGHLIGHTS),
        }
    }

    pub fn from_config(config: &InsightsConfig) -> Self {
        Self::new(config.significance_threshold, config.max_highlights)
    }

    /// Rank highlights across channels, largest absolute change first.
    ///
    /// Ties keep input order: channels as given, metrics in key order.
    pub fn rank<'a, I>(&self, channels: I) -> Vec<Highlight>
    where
        I: IntoIterator<Item = &'a ChannelAggregate>,
    {
        let mut candidates: Vec<(f64, Highlight)> = Vec::new();

        for channel in channels {
            for (key, change) in &channel.change {
                let Some(change) = *change else {
                    continue;
                };
                // The emitted value is rounded, so it must clear the bar too
                let rounded = round1(change);
                if change.abs() < self.threshold || rounded.abs() < self.threshold {
                    continue;
                }
                let Some(label) = metrics_registry::label(key) else {
                    continue;
                };

                let direction = if change > 0.0 {
                    Direction::Up
                } else {
                    Direction::Down
                };
                let severity = Severity::classify(metrics_registry::polarity(key), direction);

                candidates.push((
                    change.abs(),
                    Highlight {
                        channel: channel.channel,
                        metric: label.to_string(),
                        metric_key: key.clone(),
                        change: rounded,
                        direction,
                        severity,
                    },
                ));
            }
        }

        // Stable sort keeps input order for equal magnitudes
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
        let total = candidates.len();
        let highlights: Vec<Highlight> = candidates
            .into_iter()
            .take(self.limit)
            .map(|(_, highlight)| highlight)
            .collect();

        tracing::debug!(
            candidates = total,
            highlight_count = highlights.len(),
            threshold = self.threshold,
            "Ranked highlights"
        );

        highlights
    }
}
