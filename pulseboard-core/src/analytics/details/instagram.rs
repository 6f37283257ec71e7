//! Instagram channel details.

use serde::Serialize;

use super::{metric, ChannelDetail, DetailStrategy};
use crate::analytics::delta::percent_change;
use crate::types::{MetricMap, Provider};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstagramDetail {
    pub reach: Option<f64>,
    pub engagement: Option<f64>,
    pub followers: Option<f64>,
    /// engagement / reach * 100 over the current window; null when reach is 0
    pub engagement_rate: Option<f64>,
    pub change: InstagramChange,
}

/// Engagement rate has no change entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstagramChange {
    pub reach: Option<f64>,
    pub engagement: Option<f64>,
    pub followers: Option<f64>,
}

pub struct InstagramDetails;

impl InstagramDetails {
    /// Engagement rate with the current window's reach as denominator.
    pub fn engagement_rate(current: &MetricMap) -> Option<f64> {
        let reach = metric(current, "reach")?;
        if reach > 0.0 {
            let engagement = metric(current, "engagement").unwrap_or(0.0);
            Some(engagement / reach * 100.0)
        } else {
            None
        }
    }
}

impl DetailStrategy for InstagramDetails {
    fn provider(&self) -> Provider {
        Provider::MetaInstagram
    }

    fn derive(&self, current: &MetricMap, previous: &MetricMap) -> ChannelDetail {
        let delta = |key: &str| percent_change(metric(current, key), metric(previous, key));

        ChannelDetail::Instagram(InstagramDetail {
            reach: metric(current, "reach"),
            engagement: metric(current, "engagement"),
            followers: metric(current, "followers"),
            engagement_rate: Self::engagement_rate(current),
            change: InstagramChange {
                reach: delta("reach"),
                engagement: delta("engagement"),
                followers: delta("followers"),
            },
        })
    }
}
