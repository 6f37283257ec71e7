//! Per-provider channel detail derivation.
//!
//! Each provider with a detail view registers a [`DetailStrategy`] that turns
//! a channel's aggregated current/previous maps into a denormalized detail
//! shape with derived fields and their changes. Derived values are computed
//! for both windows first, and the change is taken on the derived values.
//!
//! ## Built-in Strategies
//!
//! - [`youtube`]: engagement (likes + comments + shares) and subscribers
//! - [`instagram`]: engagement rate over current-window reach
//! - [`facebook`]: passthrough fields
//! - [`store`]: average order value (SmartStore and Coupang)

pub mod facebook;
pub mod instagram;
pub mod store;
pub mod youtube;

use std::collections::BTreeMap;

use serde::Serialize;

use super::channels::ChannelAggregate;
use crate::types::{MetricMap, Provider};

pub use facebook::{FacebookDetail, FacebookDetails};
pub use instagram::{InstagramDetail, InstagramDetails};
pub use store::{StoreDetail, StoreDetails};
pub use youtube::{YoutubeDetail, YoutubeDetails};

/// Detail view for one provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChannelDetail {
    Youtube(YoutubeDetail),
    Instagram(InstagramDetail),
    Facebook(FacebookDetail),
    Store(StoreDetail),
}

/// Strategy that derives a provider's detail view.
///
/// Strategies are pure: the same maps always produce the same detail.
pub trait DetailStrategy: Send + Sync {
    /// Provider this strategy is registered for.
    fn provider(&self) -> Provider;

    /// Derive the detail view from aggregated current and previous maps.
    fn derive(&self, current: &MetricMap, previous: &MetricMap) -> ChannelDetail;
}

/// Provider-keyed registry of detail strategies.
pub struct DetailBuilder {
    strategies: BTreeMap<Provider, Box<dyn DetailStrategy>>,
}

impl DetailBuilder {
    /// Create a builder with no strategies.
    pub fn new() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    /// Register a strategy, replacing any previous one for the same provider.
    pub fn register(&mut self, strategy: Box<dyn DetailStrategy>) {
        tracing::debug!(provider = %strategy.provider(), "Registered detail strategy");
        self.strategies.insert(strategy.provider(), strategy);
    }

    /// Providers that have a registered strategy.
    pub fn providers(&self) -> Vec<Provider> {
        self.strategies.keys().copied().collect()
    }

    /// Build detail views for every channel with current-window snapshots.
    ///
    /// Channels without current data, or without a strategy, are omitted
    /// entirely rather than reported as all-null details.
    pub fn build<'a, I>(&self, channels: I) -> BTreeMap<Provider, ChannelDetail>
    where
        I: IntoIterator<Item = &'a ChannelAggregate>,
    {
        channels
            .into_iter()
            .filter(|channel| channel.has_current_data())
            .filter_map(|channel| {
                self.strategies.get(&channel.channel).map(|strategy| {
                    (
                        channel.channel,
                        strategy.derive(&channel.current, &channel.previous),
                    )
                })
            })
            .collect()
    }
}

impl Default for DetailBuilder {
    /// Builder with all built-in strategies registered.
    fn default() -> Self {
        let mut builder = Self::new();
        builder.register(Box::new(YoutubeDetails));
        builder.register(Box::new(InstagramDetails));
        builder.register(Box::new(FacebookDetails));
        builder.register(Box::new(StoreDetails::new(Provider::Smartstore)));
        builder.register(Box::new(StoreDetails::new(Provider::Coupang)));
        builder
    }
}

/// Value of a metric, `None` when absent or null.
pub(crate) fn metric(map: &MetricMap, key: &str) -> Option<f64> {
    map.get(key).copied().flatten()
}

/// Sum of the present metrics among `keys`, `None` when none is present.
pub(crate) fn sum_of(map: &MetricMap, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| metric(map, key))
        .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}
