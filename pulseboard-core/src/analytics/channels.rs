//! Per-channel grouping of snapshots.
//!
//! Each provider in a group's allow-list gets its own current and previous
//! metric maps, accumulated independently with the same reducer rules as the
//! overview. A provider may have several connections; their snapshots are
//! combined.

use serde::Serialize;

use super::aggregate::aggregate;
use super::delta::compute_change;
use crate::types::{ChannelGroup, MetricMap, MetricSnapshot, Provider};

/// Aggregated data for one channel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAggregate {
    pub channel: Provider,
    pub channel_name: String,
    pub current: MetricMap,
    /// Empty (not zero-filled) when the previous window had no snapshots
    pub previous: MetricMap,
    /// Percentage change per current key
    pub change: MetricMap,
    /// Number of current-window snapshots that contributed
    #[serde(skip)]
    pub snapshot_count: usize,
}

impl ChannelAggregate {
    /// Whether any current-window snapshot exists for this channel.
    pub fn has_current_data(&self) -> bool {
        self.snapshot_count > 0
    }
}

/// Group current and previous snapshots into channel aggregates.
///
/// Providers appear in the group's static order, and only when they have
/// snapshots in at least one of the two windows.
pub fn group_channels(
    current: &[&MetricSnapshot],
    previous: &[&MetricSnapshot],
    group: ChannelGroup,
) -> Vec<ChannelAggregate> {
    group
        .providers()
        .iter()
        .filter_map(|&provider| build_channel(provider, current, previous))
        .collect()
}

fn build_channel(
    provider: Provider,
    current: &[&MetricSnapshot],
    previous: &[&MetricSnapshot],
) -> Option<ChannelAggregate> {
    let current: Vec<&MetricSnapshot> = of_provider(current, provider);
    let previous: Vec<&MetricSnapshot> = of_provider(previous, provider);
    if current.is_empty() && previous.is_empty() {
        return None;
    }

    let current_map = aggregate(current.iter().copied());
    let previous_map = aggregate(previous.iter().copied());
    let change = compute_change(&current_map, &previous_map);
    let channel_name =
        resolve_channel_name(provider, current.iter().chain(previous.iter()).copied());

    tracing::debug!(
        channel = %provider,
        current_snapshots = current.len(),
        previous_snapshots = previous.len(),
        "Grouped channel"
    );

    Some(ChannelAggregate {
        channel: provider,
        channel_name,
        current: current_map,
        previous: previous_map,
        change,
        snapshot_count: current.len(),
    })
}

fn of_provider<'a>(snapshots: &[&'a MetricSnapshot], provider: Provider) -> Vec<&'a MetricSnapshot> {
    snapshots
        .iter()
        .copied()
        .filter(|s| s.provider() == Some(provider))
        .collect()
}

/// Prefer the first configured account name, fall back to the provider label.
fn resolve_channel_name<'a, I>(provider: Provider, snapshots: I) -> String
where
    I: IntoIterator<Item = &'a MetricSnapshot>,
{
    snapshots
        .into_iter()
        .filter_map(|s| s.connection.as_ref().and_then(|c| c.display_name()))
        .next()
        .unwrap_or_else(|| provider.label())
        .to_string()
}
