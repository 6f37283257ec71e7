//! Commerce channel details (SmartStore, Coupang).

use serde::Serialize;

use super::{metric, ChannelDetail, DetailStrategy};
use crate::analytics::delta::percent_change;
use crate::types::{MetricMap, Provider};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDetail {
    pub revenue: Option<f64>,
    pub orders: Option<f64>,
    /// revenue / orders; null when there are no orders
    pub avg_order_value: Option<f64>,
    pub change: StoreChange,
}

/// Average order value has no change entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreChange {
    pub revenue: Option<f64>,
    pub orders: Option<f64>,
}

/// One instance per store provider.
pub struct StoreDetails {
    provider: Provider,
}

impl StoreDetails {
    pub fn new(provider: Provider) -> Self {
        Self { provider }
    }

    pub fn avg_order_value(current: &MetricMap) -> Option<f64> {
        let orders = metric(current, "orders").filter(|orders| *orders > 0.0)?;
        Some(metric(current, "revenue").unwrap_or(0.0) / orders)
    }
}

impl DetailStrategy for StoreDetails {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn derive(&self, current: &MetricMap, previous: &MetricMap) -> ChannelDetail {
        let delta = |key: &str| percent_change(metric(current, key), metric(previous, key));

        ChannelDetail::Store(StoreDetail {
            revenue: metric(current, "revenue"),
            orders: metric(current, "orders"),
            avg_order_value: Self::avg_order_value(current),
            change: StoreChange {
                revenue: delta("revenue"),
                orders: delta("orders"),
            },
        })
    }
}
