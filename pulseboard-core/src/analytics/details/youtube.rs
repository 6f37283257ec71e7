//! YouTube channel details.

use serde::Serialize;

use super::{metric, sum_of, ChannelDetail, DetailStrategy};
use crate::analytics::delta::percent_change;
use crate::types::{MetricMap, Provider};

const ENGAGEMENT_PARTS: &[&str] = &["likes", "comments", "shares"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YoutubeDetail {
    pub views: Option<f64>,
    pub likes: Option<f64>,
    pub comments: Option<f64>,
    pub shares: Option<f64>,
    /// likes + comments + shares
    pub engagement: Option<f64>,
    /// followers gained, else reported subscriber count
    pub subscribers: Option<f64>,
    pub watch_time_minutes: Option<f64>,
    pub uploads: Option<f64>,
    pub change: YoutubeChange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YoutubeChange {
    pub views: Option<f64>,
    pub likes: Option<f64>,
    pub comments: Option<f64>,
    pub shares: Option<f64>,
    pub engagement: Option<f64>,
    pub subscribers: Option<f64>,
    pub watch_time_minutes: Option<f64>,
    pub uploads: Option<f64>,
}

pub struct YoutubeDetails;

impl YoutubeDetails {
    fn engagement(map: &MetricMap) -> Option<f64> {
        sum_of(map, ENGAGEMENT_PARTS)
    }

    fn subscribers(map: &MetricMap) -> Option<f64> {
        metric(map, "followers").or_else(|| metric(map, "subscriberCount"))
    }
}

impl DetailStrategy for YoutubeDetails {
    fn provider(&self) -> Provider {
        Provider::Youtube
    }

    fn derive(&self, current: &MetricMap, previous: &MetricMap) -> ChannelDetail {
        let delta = |key: &str| percent_change(metric(current, key), metric(previous, key));

        ChannelDetail::Youtube(YoutubeDetail {
            views: metric(current, "views"),
            likes: metric(current, "likes"),
            comments: metric(current, "comments"),
            shares: metric(current, "shares"),
            engagement: Self::engagement(current),
            subscribers: Self::subscribers(current),
            watch_time_minutes: metric(current, "watchTimeMinutes"),
            uploads: metric(current, "uploads"),
            change: YoutubeChange {
                views: delta("views"),
                likes: delta("likes"),
                comments: delta("comments"),
                shares: delta("shares"),
                engagement: percent_change(Self::engagement(current), Self::engagement(previous)),
                subscribers: percent_change(
                    Self::subscribers(current),
                    Self::subscribers(previous),
                ),
                watch_time_minutes: delta("watchTimeMinutes"),
                uploads: delta("uploads"),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, f64)]) -> MetricMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), Some(*v)))
            .collect()
    }

    fn derive(current: &MetricMap, previous: &MetricMap) -> YoutubeDetail {
        match YoutubeDetails.derive(current, previous) {
            ChannelDetail::Youtube(detail) => detail,
            other => panic!("unexpected detail: {:?}", other),
        }
    }

    #[test]
    fn test_engagement_delta_uses_derived_totals() {
        // Field deltas are +100%, -50%, -50%; their average would be 0%
        let current = map(&[("likes", 80.0), ("comments", 10.0), ("shares", 10.0)]);
        let previous = map(&[("likes", 40.0), ("comments", 20.0), ("shares", 20.0)]);
        let detail = derive(&current, &previous);

        assert_eq!(detail.engagement, Some(100.0));
        assert_eq!(detail.change.engagement, Some(25.0));
        assert_eq!(detail.change.likes, Some(100.0));
        assert_eq!(detail.change.comments, Some(-50.0));

        let skewed = map(&[("likes", 90.0), ("comments", 5.0), ("shares", 5.0)]);
        let detail = derive(&skewed, &previous);
        // (100 - 80) / 80
        assert_eq!(detail.change.engagement, Some(25.0));
        assert_eq!(detail.change.likes, Some(125.0));
    }

    #[test]
    fn test_subscribers_fallback() {
        let current = map(&[("subscriberCount", 1200.0)]);
        let previous = map(&[("subscriberCount", 1000.0)]);
        let detail = derive(&current, &previous);
        assert_eq!(detail.subscribers, Some(1200.0));
        assert_eq!(detail.change.subscribers, Some(20.0));

        let with_followers = map(&[("followers", 50.0), ("subscriberCount", 1200.0)]);
        assert_eq!(derive(&with_followers, &previous).subscribers, Some(50.0));
    }

    #[test]
    fn test_missing_fields_are_null() {
        let detail = derive(&map(&[("views", 10.0)]), &MetricMap::new());
        assert_eq!(detail.views, Some(10.0));
        assert_eq!(detail.engagement, None);
        assert_eq!(detail.subscribers, None);
        assert_eq!(detail.change.views, None);
    }
}
