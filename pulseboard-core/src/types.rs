//! Core domain types for pulseboard
//!
//! These types describe the read-only input the engine consumes: metric
//! snapshots produced upstream by sync jobs and CSV imports, and the post
//! records used for the top-post ranking.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Provider** | An external data source (YouTube, Instagram, SmartStore, ...) |
//! | **Connection** | One connected account of a provider; a provider may have several |
//! | **Snapshot** | Immutable, time-windowed metric record for one connection |
//! | **Channel group** | SNS, Store or Traffic; decides which report section a provider lands in |
//! | **Metric map** | Bag of named numeric facts for one window |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Named numeric facts for one window. `None` serializes as JSON `null`.
pub type MetricMap = BTreeMap<String, Option<f64>>;

/// Raw snapshot payload: leaves may be numbers, strings or null.
pub type SnapshotData = BTreeMap<String, serde_json::Value>;

// ============================================
// Period type
// ============================================

/// Granularity of a snapshot or a report window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodType {
    Daily,
    Weekly,
    Monthly,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Daily => "DAILY",
            PeriodType::Weekly => "WEEKLY",
            PeriodType::Monthly => "MONTHLY",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PeriodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DAILY" => Ok(PeriodType::Daily),
            "WEEKLY" => Ok(PeriodType::Weekly),
            "MONTHLY" => Ok(PeriodType::Monthly),
            _ => Err(format!("unknown period type: {}", s)),
        }
    }
}

// ============================================
// Providers and channel groups
// ============================================

/// External data source a connection belongs to.
///
/// Declaration order is the display order used for channel lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provider {
    Youtube,
    MetaInstagram,
    MetaFacebook,
    NaverBlog,
    Smartstore,
    Coupang,
    Ga4,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Youtube => "YOUTUBE",
            Provider::MetaInstagram => "META_INSTAGRAM",
            Provider::MetaFacebook => "META_FACEBOOK",
            Provider::NaverBlog => "NAVER_BLOG",
            Provider::Smartstore => "SMARTSTORE",
            Provider::Coupang => "COUPANG",
            Provider::Ga4 => "GA4",
        }
    }

    /// Fallback channel name when a connection has no display name.
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Youtube => "YouTube",
            Provider::MetaInstagram => "Instagram",
            Provider::MetaFacebook => "Facebook",
            Provider::NaverBlog => "Naver Blog",
            Provider::Smartstore => "SmartStore",
            Provider::Coupang => "Coupang",
            Provider::Ga4 => "Google Analytics",
        }
    }

    /// Which report section this provider's channel belongs to.
    pub fn group(&self) -> ChannelGroup {
        match self {
            Provider::Youtube
            | Provider::MetaInstagram
            | Provider::MetaFacebook
            | Provider::NaverBlog => ChannelGroup::Sns,
            Provider::Smartstore | Provider::Coupang => ChannelGroup::Store,
            Provider::Ga4 => ChannelGroup::Traffic,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "YOUTUBE" => Ok(Provider::Youtube),
            "META_INSTAGRAM" => Ok(Provider::MetaInstagram),
            "META_FACEBOOK" => Ok(Provider::MetaFacebook),
            "NAVER_BLOG" => Ok(Provider::NaverBlog),
            "SMARTSTORE" => Ok(Provider::Smartstore),
            "COUPANG" => Ok(Provider::Coupang),
            "GA4" => Ok(Provider::Ga4),
            _ => Err(format!("unknown provider: {}", s)),
        }
    }
}

/// Report section a channel is grouped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelGroup {
    /// Social channels (YouTube, Instagram, Facebook, Naver Blog)
    Sns,
    /// Commerce channels (SmartStore, Coupang)
    Store,
    /// Site traffic (GA4)
    Traffic,
}

impl ChannelGroup {
    /// Static allow-list of providers for this group, in display order.
    pub fn providers(&self) -> &'static [Provider] {
        match self {
            ChannelGroup::Sns => &[
                Provider::Youtube,
                Provider::MetaInstagram,
                Provider::MetaFacebook,
                Provider::NaverBlog,
            ],
            ChannelGroup::Store => &[Provider::Smartstore, Provider::Coupang],
            ChannelGroup::Traffic => &[Provider::Ga4],
        }
    }

    pub fn contains(&self, provider: Provider) -> bool {
        self.providers().contains(&provider)
    }
}

// ============================================
// Snapshots
// ============================================

/// A connected account of a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub provider: Provider,
    /// Display name configured for the connection
    #[serde(default)]
    pub account_name: Option<String>,
}

impl Connection {
    /// Account name if it is set and not blank.
    pub fn display_name(&self) -> Option<&str> {
        self.account_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Immutable, time-windowed metric record for one connection.
///
/// Produced upstream by sync jobs or CSV import; the engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSnapshot {
    pub period_type: PeriodType,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    /// A payload that is not a JSON object reads as empty
    #[serde(default, deserialize_with = "lenient_data")]
    pub data: SnapshotData,
    /// `None` for snapshots that are not tied to a connection
    #[serde(default)]
    pub connection: Option<Connection>,
}

impl MetricSnapshot {
    pub fn provider(&self) -> Option<Provider> {
        self.connection.as_ref().map(|c| c.provider)
    }

    /// Identity of the contributing connection: provider plus account name.
    pub fn connection_key(&self) -> Option<(Provider, Option<&str>)> {
        self.connection
            .as_ref()
            .map(|c| (c.provider, c.account_name.as_deref()))
    }
}

/// A single published post, used for the top-post ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub provider: Provider,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    pub published_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_data")]
    pub data: SnapshotData,
}

/// Read a payload, treating `null`, arrays and scalars as an empty object.
fn lenient_data<'de, D>(deserializer: D) -> Result<SnapshotData, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
        serde_json::Value::Null => Ok(SnapshotData::new()),
        other => {
            tracing::debug!(raw = %other, "Ignoring non-object payload");
            Ok(SnapshotData::new())
        }
    }
}

// ============================================
// Leaf coercion
// ============================================

/// Coerce a raw snapshot leaf into a finite number.
///
/// Numbers pass through when finite. Strings are parsed after trimming and
/// dropping thousands separators (`"1,234"`). Anything else is `None`.
pub fn coerce_metric(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        serde_json::Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_metric() {
        assert_eq!(coerce_metric(&json!(42)), Some(42.0));
        assert_eq!(coerce_metric(&json!(1.5)), Some(1.5));
        assert_eq!(coerce_metric(&json!("1,234")), Some(1234.0));
        assert_eq!(coerce_metric(&json!(" 7.25 ")), Some(7.25));
        assert_eq!(coerce_metric(&json!("n/a")), None);
        assert_eq!(coerce_metric(&json!("NaN")), None);
        assert_eq!(coerce_metric(&json!("")), None);
        assert_eq!(coerce_metric(&json!(null)), None);
        assert_eq!(coerce_metric(&json!(true)), None);
        assert_eq!(coerce_metric(&json!({"nested": 1})), None);
    }

    #[test]
    fn test_provider_serde_names() {
        assert_eq!(
            serde_json::to_string(&Provider::MetaInstagram).unwrap(),
            "\"META_INSTAGRAM\""
        );
        assert_eq!(serde_json::to_string(&Provider::Ga4).unwrap(), "\"GA4\"");
        let parsed: Provider = serde_json::from_str("\"NAVER_BLOG\"").unwrap();
        assert_eq!(parsed, Provider::NaverBlog);
        assert_eq!("smartstore".parse::<Provider>(), Ok(Provider::Smartstore));
    }

    #[test]
    fn test_channel_groups() {
        assert_eq!(Provider::Youtube.group(), ChannelGroup::Sns);
        assert_eq!(Provider::Coupang.group(), ChannelGroup::Store);
        assert_eq!(Provider::Ga4.group(), ChannelGroup::Traffic);
        assert!(ChannelGroup::Store.contains(Provider::Smartstore));
        assert!(!ChannelGroup::Sns.contains(Provider::Smartstore));
    }

    #[test]
    fn test_parse_snapshot() {
        let raw = json!({
            "periodType": "WEEKLY",
            "periodStart": "2024-03-11T00:00:00Z",
            "periodEnd": "2024-03-17T23:59:59Z",
            "data": {"revenue": 100, "sales": "50", "note": "hand-entered"},
            "connection": {"provider": "SMARTSTORE", "accountName": "  "}
        });
        let snapshot: MetricSnapshot = serde_json::from_value(raw).unwrap();
        assert_eq!(snapshot.period_type, PeriodType::Weekly);
        assert_eq!(snapshot.provider(), Some(Provider::Smartstore));
        assert_eq!(snapshot.connection.as_ref().unwrap().display_name(), None);
        assert_eq!(snapshot.data.len(), 3);

        let orphan: MetricSnapshot = serde_json::from_value(json!({
            "periodType": "DAILY",
            "periodStart": "2024-03-11T00:00:00+09:00",
            "periodEnd": "2024-03-11T23:59:59+09:00",
            "connection": null
        }))
        .unwrap();
        assert!(orphan.provider().is_none());
        assert!(orphan.data.is_empty());
    }

    #[test]
    fn test_malformed_data_reads_as_empty() {
        let raw = json!([
            {
                "periodType": "WEEKLY",
                "periodStart": "2024-03-11T00:00:00Z",
                "periodEnd": "2024-03-17T23:59:59Z",
                "data": null,
                "connection": {"provider": "YOUTUBE"}
            },
            {
                "periodType": "WEEKLY",
                "periodStart": "2024-03-11T00:00:00Z",
                "periodEnd": "2024-03-17T23:59:59Z",
                "data": [1, 2],
                "connection": {"provider": "YOUTUBE"}
            },
            {
                "periodType": "WEEKLY",
                "periodStart": "2024-03-11T00:00:00Z",
                "periodEnd": "2024-03-17T23:59:59Z",
                "data": "views=10",
                "connection": {"provider": "YOUTUBE"}
            },
            {
                "periodType": "WEEKLY",
                "periodStart": "2024-03-11T00:00:00Z",
                "periodEnd": "2024-03-17T23:59:59Z",
                "data": {"views": 10},
                "connection": {"provider": "YOUTUBE"}
            }
        ]);
        let snapshots: Vec<MetricSnapshot> = serde_json::from_value(raw).unwrap();
        assert_eq!(snapshots.len(), 4);
        assert!(snapshots[..3].iter().all(|s| s.data.is_empty()));
        assert_eq!(snapshots[3].data["views"], json!(10));

        let post: PostRecord = serde_json::from_value(json!({
            "provider": "META_INSTAGRAM",
            "title": "Reel",
            "publishedAt": "2024-03-12T09:00:00Z",
            "data": 42
        }))
        .unwrap();
        assert!(post.data.is_empty());
    }

    #[test]
    fn test_period_type_from_str() {
        assert_eq!("weekly".parse::<PeriodType>(), Ok(PeriodType::Weekly));
        assert_eq!("MONTHLY".parse::<PeriodType>(), Ok(PeriodType::Monthly));
        assert!("yearly".parse::<PeriodType>().is_err());
    }
}
