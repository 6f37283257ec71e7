//! Insight report generation.
//!
//! Wires the pipeline together for one request:
//!
//! ```text
//! PeriodWindow ─► select snapshots ─► aggregate (overview / previous)
//!                        │
//!                        └─► group channels ─► change ─┬─► highlights
//!                                                      └─► channel details
//! ```
//!
//! Every intermediate value is request-scoped; the engine holds only its
//! configuration and can be shared across threads.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::aggregate::{aggregate, select_current, select_previous};
use super::channels::{group_channels, ChannelAggregate};
use super::details::{ChannelDetail, DetailBuilder};
use super::highlights::{Highlight, HighlightRanker};
use super::period::{resolve_date, PeriodWindow};
use super::posts::{rank_top_posts, TopPost};
use crate::config::InsightsConfig;
use crate::error::Result;
use crate::types::{ChannelGroup, MetricMap, MetricSnapshot, PeriodType, PostRecord, Provider};

/// Site traffic (GA4) for the current and previous window.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSummary {
    pub current: MetricMap,
    pub previous: MetricMap,
    pub change: MetricMap,
}

impl From<ChannelAggregate> for TrafficSummary {
    fn from(channel: ChannelAggregate) -> Self {
        Self {
            current: channel.current,
            previous: channel.previous,
            change: channel.change,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnsSection {
    pub channels: Vec<ChannelAggregate>,
    pub top_posts: Vec<TopPost>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSection {
    pub traffic: TrafficSummary,
    pub channels: Vec<ChannelAggregate>,
}

/// Aggregate and highlight result for one window pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub period: PeriodWindow,
    pub overview: MetricMap,
    pub previous: MetricMap,
    pub sns: SnsSection,
    pub store: StoreSection,
    /// At most five, largest absolute change first
    pub highlights: Vec<Highlight>,
    pub channel_details: BTreeMap<Provider, ChannelDetail>,
}

/// Stateless engine producing [`InsightReport`]s.
pub struct InsightEngine {
    ranker: HighlightRanker,
    details: DetailBuilder,
    top_posts: usize,
    timezone: chrono_tz::Tz,
}

impl InsightEngine {
    /// Create an engine from validated configuration.
    pub fn new(config: &InsightsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            ranker: HighlightRanker::from_config(config),
            details: DetailBuilder::default(),
            top_posts: config.top_posts,
            timezone: config.timezone()?,
        })
    }

    /// Replace the detail strategies.
    pub fn with_details(mut self, details: DetailBuilder) -> Self {
        self.details = details;
        self
    }

    pub fn timezone(&self) -> chrono_tz::Tz {
        self.timezone
    }

    /// Resolve the window for a calendar date in the configured timezone.
    pub fn window_for(&self, anchor: NaiveDate, period_type: PeriodType) -> Result<PeriodWindow> {
        resolve_date(anchor, &self.timezone, period_type)
    }

    /// Resolve the window for `anchor` and generate the report.
    pub fn generate_for(
        &self,
        anchor: NaiveDate,
        period_type: PeriodType,
        snapshots: &[MetricSnapshot],
        posts: &[PostRecord],
    ) -> Result<InsightReport> {
        let window = self.window_for(anchor, period_type)?;
        Ok(self.generate(window, snapshots, posts))
    }

    /// Generate the report for a resolved window.
    ///
    /// `snapshots` may span both windows (and beyond); they are partitioned
    /// here. Never fails: missing data yields empty or zero aggregates.
    pub fn generate(
        &self,
        window: PeriodWindow,
        snapshots: &[MetricSnapshot],
        posts: &[PostRecord],
    ) -> InsightReport {
        let current = select_current(snapshots, &window);
        let previous = select_previous(snapshots, &window);

        tracing::info!(
            period = %window.period_type,
            start = %window.start,
            current_snapshots = current.len(),
            previous_snapshots = previous.len(),
            "Generating insight report"
        );

        let overview = aggregate(current.iter().copied());
        let previous_overview = aggregate(previous.iter().copied());

        let sns_channels = group_channels(&current, &previous, ChannelGroup::Sns);
        let store_channels = group_channels(&current, &previous, ChannelGroup::Store);
        let traffic = group_channels(&current, &previous, ChannelGroup::Traffic)
            .into_iter()
            .next()
            .map(TrafficSummary::from)
            .unwrap_or_default();

        let highlights = self
            .ranker
            .rank(sns_channels.iter().chain(store_channels.iter()));
        let channel_details = self
            .details
            .build(sns_channels.iter().chain(store_channels.iter()));
        let top_posts = rank_top_posts(posts, &window, self.top_posts);

        tracing::debug!(
            sns_channels = sns_channels.len(),
            store_channels = store_channels.len(),
            highlight_count = highlights.len(),
            detail_count = channel_details.len(),
            "Insight report ready"
        );

        InsightReport {
            period: window,
            overview,
            previous: previous_overview,
            sns: SnsSection {
                channels: sns_channels,
                top_posts,
            },
            store: StoreSection {
                traffic,
                channels: store_channels,
            },
            highlights,
            channel_details,
        }
    }
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self {
            ranker: HighlightRanker::default(),
            details: DetailBuilder::default(),
            top_posts: InsightsConfig::default().top_posts,
            timezone: chrono_tz::UTC,
        }
    }
}
