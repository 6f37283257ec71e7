//! Metric descriptor registry.
//!
//! One immutable table decides, for every known metric key, which raw
//! spellings feed it, how snapshots combine, whether a rise is good news,
//! and how it is labelled in highlights. Keys outside the table pass through
//! aggregation unchanged with [`Reducer::Sum`] and no label.

use serde::Serialize;

/// How multiple snapshots combine into one period value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reducer {
    /// Cumulative counters (revenue, reach, followers gained, ...)
    Sum,
    /// Gauges (dau, wau, mau, ...)
    Max,
}

impl Reducer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reducer::Sum => "sum",
            Reducer::Max => "max",
        }
    }
}

/// Whether an increase of the metric is good or bad news.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    GoodUp,
    GoodDown,
    Neutral,
}

impl Polarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::GoodUp => "good_up",
            Polarity::GoodDown => "good_down",
            Polarity::Neutral => "neutral",
        }
    }
}

/// Descriptor for a canonical metric key.
#[derive(Debug, Clone, Serialize)]
pub struct MetricDescriptor {
    pub key: &'static str,
    /// Display label; also marks the metric as highlightable
    pub label: Option<&'static str>,
    pub reducer: Reducer,
    pub polarity: Polarity,
    /// Raw spellings in priority order; the first non-null one wins
    pub synonyms: &'static [&'static str],
}

impl MetricDescriptor {
    const fn sum(key: &'static str, label: &'static str, synonyms: &'static [&'static str]) -> Self {
        Self {
            key,
            label: Some(label),
            reducer: Reducer::Sum,
            polarity: Polarity::GoodUp,
            synonyms,
        }
    }

    const fn gauge(key: &'static str, label: &'static str, synonyms: &'static [&'static str]) -> Self {
        Self {
            key,
            label: Some(label),
            reducer: Reducer::Max,
            polarity: Polarity::GoodUp,
            synonyms,
        }
    }

    const fn good_down(self) -> Self {
        Self {
            polarity: Polarity::GoodDown,
            ..self
        }
    }

    const fn unlabelled(self) -> Self {
        Self {
            label: None,
            ..self
        }
    }
}

const COMMERCE_METRICS: &[MetricDescriptor] = &[
    MetricDescriptor::sum("revenue", "Revenue", &["revenue", "sales"]),
    MetricDescriptor::sum("orders", "Orders", &["orders", "orderCount"]),
    MetricDescriptor::sum("cancels", "Cancellations", &["cancels", "cancellations"]).good_down(),
    MetricDescriptor::sum("refunds", "Refunds", &["refunds"]).good_down(),
];

const SOCIAL_METRICS: &[MetricDescriptor] = &[
    MetricDescriptor::sum("reach", "Reach", &["reach", "impressions"]),
    MetricDescriptor::sum("views", "Views", &["views", "viewCount"]),
    // Instagram reports the plural spelling; it wins when both are present
    MetricDescriptor::sum("engagement", "Engagement", &["engagements", "engagement"]),
    MetricDescriptor::sum("likes", "Likes", &["likes"]),
    MetricDescriptor::sum("comments", "Comments", &["comments"]),
    MetricDescriptor::sum("shares", "Shares", &["shares"]),
    MetricDescriptor::sum(
        "followers",
        "Followers",
        &["followers", "followersGained", "subscribersGained"],
    ),
    MetricDescriptor::gauge("subscriberCount", "Subscribers", &["subscriberCount"]).unlabelled(),
    MetricDescriptor::sum("uploads", "Uploads", &["uploads"]),
    MetricDescriptor::sum("watchTimeMinutes", "Watch time", &["watchTimeMinutes", "watchTime"]),
];

const TRAFFIC_METRICS: &[MetricDescriptor] = &[
    MetricDescriptor::sum("sessions", "Sessions", &["sessions"]),
    MetricDescriptor::sum("pageViews", "Page views", &["pageViews", "screenPageViews"]),
    MetricDescriptor::sum("signups", "Sign-ups", &["signups", "newUsers"]),
    MetricDescriptor::gauge("dau", "DAU", &["dau", "totalUsers"]),
    MetricDescriptor::gauge("wau", "WAU", &["wau"]),
    MetricDescriptor::gauge("mau", "MAU", &["mau"]),
    MetricDescriptor::gauge("bounceRate", "Bounce rate", &["bounceRate", "bounce"]).good_down(),
];

const METRIC_GROUPS: &[&[MetricDescriptor]] = &[COMMERCE_METRICS, SOCIAL_METRICS, TRAFFIC_METRICS];

/// Iterate over all registered descriptors without cloning.
pub fn descriptors() -> impl Iterator<Item = &'static MetricDescriptor> {
    METRIC_GROUPS.iter().flat_map(|group| group.iter())
}

/// List all registered metrics.
pub fn list_metrics() -> Vec<MetricDescriptor> {
    descriptors().cloned().collect()
}

/// Metrics that carry a display label and may appear as highlights.
pub fn highlightable_metrics() -> Vec<MetricDescriptor> {
    descriptors().filter(|m| m.label.is_some()).cloned().collect()
}

/// Look up the descriptor for a canonical key.
pub fn descriptor(key: &str) -> Option<&'static MetricDescriptor> {
    descriptors().find(|m| m.key == key)
}

/// Look up the descriptor that consumes a raw spelling.
pub fn descriptor_for_alias(alias: &str) -> Option<&'static MetricDescriptor> {
    descriptors().find(|m| m.synonyms.iter().any(|s| *s == alias))
}

/// Display label for a canonical key, `None` if it is not highlightable.
pub fn label(key: &str) -> Option<&'static str> {
    descriptor(key).and_then(|m| m.label)
}

/// Polarity for a canonical key; unknown keys are neutral.
pub fn polarity(key: &str) -> Polarity {
    descriptor(key).map_or(Polarity::Neutral, |m| m.polarity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_and_synonyms_are_unique() {
        let mut keys = HashSet::new();
        let mut aliases = HashSet::new();
        for m in descriptors() {
            assert!(keys.insert(m.key), "duplicate key {}", m.key);
            assert!(m.synonyms.contains(&m.key), "{} must list itself", m.key);
            for alias in m.synonyms {
                assert!(aliases.insert(*alias), "alias {} claimed twice", alias);
            }
        }
    }

    #[test]
    fn test_reducers() {
        let reducer = |key: &str| descriptor(key).map(|m| m.reducer);
        assert_eq!(reducer("revenue"), Some(Reducer::Sum));
        assert_eq!(reducer("followers"), Some(Reducer::Sum));
        assert_eq!(reducer("dau"), Some(Reducer::Max));
        assert_eq!(reducer("mau"), Some(Reducer::Max));
        assert_eq!(reducer("somethingNew"), None);
    }

    #[test]
    fn test_polarity() {
        assert_eq!(polarity("revenue"), Polarity::GoodUp);
        assert_eq!(polarity("refunds"), Polarity::GoodDown);
        assert_eq!(polarity("bounceRate"), Polarity::GoodDown);
        assert_eq!(polarity("somethingNew"), Polarity::Neutral);
    }

    #[test]
    fn test_alias_lookup() {
        assert_eq!(descriptor_for_alias("sales").map(|m| m.key), Some("revenue"));
        assert_eq!(descriptor_for_alias("totalUsers").map(|m| m.key), Some("dau"));
        assert_eq!(descriptor_for_alias("impressions").map(|m| m.key), Some("reach"));
        assert!(descriptor_for_alias("avgOrderValue").is_none());
    }

    #[test]
    fn test_engagement_prefers_plural_spelling() {
        let engagement = descriptor("engagement").unwrap();
        assert_eq!(engagement.synonyms, &["engagements", "engagement"]);
    }

    #[test]
    fn test_highlightable_excludes_unlabelled() {
        let keys: Vec<_> = highlightable_metrics().iter().map(|m| m.key).collect();
        assert!(keys.contains(&"revenue"));
        assert!(!keys.contains(&"subscriberCount"));
        assert_eq!(label("subscriberCount"), None);
        assert_eq!(label("cancels"), Some("Cancellations"));
        assert_eq!(list_metrics().len(), keys.len() + 1);
    }
}
