//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/pulseboard/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/pulseboard/` (~/.config/pulseboard/)
//! - State/Logs: `$XDG_STATE_HOME/pulseboard/` (~/.local/state/pulseboard/)

use crate::analytics::highlights::{MAX_HIGHLIGHTS, SIGNIFICANCE_THRESHOLD};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Insight engine configuration
    #[serde(default)]
    pub insights: InsightsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Insight engine configuration
#[derive(Debug, Deserialize, Clone)]
pub struct InsightsConfig {
    /// Minimum absolute change (percentage points) for a highlight
    #[serde(default = "default_significance_threshold")]
    pub significance_threshold: f64,

    /// Number of highlights to keep (at most 5)
    #[serde(default = "default_max_highlights")]
    pub max_highlights: usize,

    /// Number of top posts in the SNS section
    #[serde(default = "default_top_posts")]
    pub top_posts: usize,

    /// IANA timezone for period boundaries (e.g. "Asia/Seoul"); UTC when unset
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            significance_threshold: default_significance_threshold(),
            max_highlights: default_max_highlights(),
            top_posts: default_top_posts(),
            timezone: None,
        }
    }
}

impl InsightsConfig {
    /// Parse the configured timezone.
    pub fn timezone(&self) -> Result<chrono_tz::Tz> {
        match self.timezone.as_deref() {
            None => Ok(chrono_tz::UTC),
            Some(name) => parse_timezone(name),
        }
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if !self.significance_threshold.is_finite() || self.significance_threshold < 0.0 {
            return Err(Error::Config(
                "insights.significance_threshold must be a finite, non-negative number"
                    .to_string(),
            ));
        }
        if self.max_highlights == 0 || self.max_highlights > MAX_HIGHLIGHTS {
            return Err(Error::Config(format!(
                "insights.max_highlights must be between 1 and {}",
                MAX_HIGHLIGHTS
            )));
        }
        self.timezone()?;
        Ok(())
    }
}

/// Parse an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<chrono_tz::Tz> {
    name.parse::<chrono_tz::Tz>()
        .map_err(|_| Error::InvalidTimezone(name.to_string()))
}

fn default_significance_threshold() -> f64 {
    SIGNIFICANCE_THRESHOLD
}

fn default_max_highlights() -> usize {
    MAX_HIGHLIGHTS
}

fn default_top_posts() -> usize {
    5
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.insights.validate()
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/pulseboard/config.toml` (~/.config/pulseboard/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("pulseboard").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/pulseboard/` (~/.local/state/pulseboard/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("pulseboard")
    }
}
