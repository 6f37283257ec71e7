//! Top SNS posts of the current window.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::period::PeriodWindow;
use crate::types::{coerce_metric, ChannelGroup, PostRecord, Provider, SnapshotData};

const ENGAGEMENT_PARTS: &[&str] = &["likes", "comments", "shares"];
const ENGAGEMENT_TOTALS: &[&str] = &["engagement", "engagements"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPost {
    pub channel: Provider,
    pub title: String,
    pub url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub engagement: f64,
}

/// Engagement of a post: likes + comments + shares, else a reported total.
pub fn post_engagement(data: &SnapshotData) -> f64 {
    let parts: Vec<f64> = ENGAGEMENT_PARTS
        .iter()
        .filter_map(|key| data.get(*key).and_then(coerce_metric))
        .collect();
    if !parts.is_empty() {
        return parts.iter().sum();
    }
    ENGAGEMENT_TOTALS
        .iter()
        .find_map(|key| data.get(*key).and_then(coerce_metric))
        .unwrap_or(0.0)
}

/// Rank SNS posts published inside the current window.
///
/// Highest engagement first; ties go to the most recent post.
pub fn rank_top_posts(posts: &[PostRecord], window: &PeriodWindow, limit: usize) -> Vec<TopPost> {
    let mut ranked: Vec<TopPost> = posts
        .iter()
        .filter(|post| ChannelGroup::Sns.contains(post.provider))
        .filter(|post| window.contains_current(&post.published_at))
        .map(|post| TopPost {
            channel: post.provider,
            title: post.title.clone(),
            url: post.url.clone(),
            published_at: post.published_at,
            engagement: post_engagement(&post.data),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.engagement
            .total_cmp(&a.engagement)
            .then_with(|| b.published_at.cmp(&a.published_at))
    });
    ranked.truncate(limit);
    ranked
}
