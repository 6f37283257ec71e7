//! # pulseboard-core
//!
//! Core library for pulseboard - a metrics aggregation and insight engine
//! for multi-channel marketing dashboards.
//!
//! This library provides:
//! - Domain types for metric snapshots and posts
//! - Period resolution, aggregation and change computation
//! - Highlight ranking, channel details and correlation
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use pulseboard_core::analytics::InsightEngine;
//! use pulseboard_core::{Config, PeriodType};
//!
//! let config = Config::load().expect("failed to load config");
//! let engine = InsightEngine::new(&config.insights).expect("invalid config");
//!
//! let anchor = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
//! let report = engine
//!     .generate_for(anchor, PeriodType::Weekly, &[], &[])
//!     .expect("failed to resolve period");
//! println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod types;
