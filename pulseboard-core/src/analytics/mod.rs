//! Analytics module for pulseboard
//!
//! Turns raw metric snapshots into dashboard insights:
//! - Period windows (weekly/monthly, timezone aware)
//! - Registry-driven snapshot aggregation
//! - Per-channel grouping and percent change
//! - Highlight ranking and per-provider channel details
//! - Top posts and bivariate correlation
//!
//! ## Detail Strategies
//!
//! Provider-specific views are produced by [`details::DetailStrategy`]
//! implementations registered on a [`details::DetailBuilder`]. See
//! [`insights`] for the engine that drives the whole pipeline.

pub mod aggregate;
pub mod channels;
pub mod correlation;
pub mod delta;
pub mod details;
pub mod highlights;
pub mod insights;
pub mod metrics_registry;
pub mod period;
pub mod posts;

// Engine exports
pub use insights::{InsightEngine, InsightReport, SnsSection, StoreSection, TrafficSummary};

pub use aggregate::{aggregate, select_current, select_previous, MetricAccumulator};
pub use channels::{group_channels, ChannelAggregate};
pub use correlation::{correlate, correlate_rows, CorrelationResult, CorrelationRow, Interpretation, Strength};
pub use delta::{compute_change, percent_change};
pub use details::{ChannelDetail, DetailBuilder, DetailStrategy};
pub use highlights::{Direction, Highlight, HighlightRanker, Severity};
pub use metrics_registry::{MetricDescriptor, Polarity, Reducer};
pub use period::{resolve, resolve_date, PeriodWindow};
pub use posts::{rank_top_posts, TopPost};
