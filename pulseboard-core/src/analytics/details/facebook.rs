//! Facebook channel details.

use serde::Serialize;

use super::{metric, ChannelDetail, DetailStrategy};
use crate::analytics::delta::percent_change;
use crate::types::{MetricMap, Provider};

const FIELDS: [&str; 4] = ["reach", "engagement", "followers", "pageViews"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacebookDetail {
    pub reach: Option<f64>,
    pub engagement: Option<f64>,
    pub followers: Option<f64>,
    pub page_views: Option<f64>,
    pub change: FacebookChange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacebookChange {
    pub reach: Option<f64>,
    pub engagement: Option<f64>,
    pub followers: Option<f64>,
    pub page_views: Option<f64>,
}

pub struct FacebookDetails;

impl DetailStrategy for FacebookDetails {
    fn provider(&self) -> Provider {
        Provider::MetaFacebook
    }

    fn derive(&self, current: &MetricMap, previous: &MetricMap) -> ChannelDetail {
        let [reach, engagement, followers, page_views] = FIELDS.map(|key| metric(current, key));
        let [d_reach, d_engagement, d_followers, d_page_views] =
            FIELDS.map(|key| percent_change(metric(current, key), metric(previous, key)));

        ChannelDetail::Facebook(FacebookDetail {
            reach,
            engagement,
            followers,
            page_views,
            change: FacebookChange {
                reach: d_reach,
                engagement: d_engagement,
                followers: d_followers,
                page_views: d_page_views,
            },
        })
    }
}
