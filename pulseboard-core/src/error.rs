//! Error types for pulseboard-core
//!
//! Data-quality problems (missing snapshots, non-numeric leaves, zero
//! denominators) are never errors: the engine degrades them to `null` or
//! `0`. The variants below cover configuration and caller mistakes only.

use crate::types::PeriodType;
use thiserror::Error;

/// Main error type for the pulseboard-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Timezone name not found in the IANA database
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Period type the resolver has no window for
    #[error("unsupported period type for window resolution: {0}")]
    UnsupportedPeriod(PeriodType),

    /// Anchor date that cannot be turned into a window
    #[error("invalid anchor date: {0}")]
    InvalidAnchor(String),
}

/// Result type alias for pulseboard-core
pub type Result<T> = std::result::Result<T, Error>;
