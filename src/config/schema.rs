//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::store::DEFAULT_MAX_REPORTS_PER_VIEW;

/// Root configuration for the observation store process.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Per-view retention.
    pub retention: RetentionConfig,

    /// Report admission policy.
    pub ingestion: IngestionConfig,

    /// Subjects watched from start-up.
    pub watchlist: WatchlistConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Retention configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RetentionConfig {
    /// Observations kept per (observer, subject) view.
    pub max_reports_per_view: usize,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            max_reports_per_view: DEFAULT_MAX_REPORTS_PER_VIEW,
        }
    }
}

/// Ingestion configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct IngestionConfig {
    /// Ignore reports about subjects not on the watchlist.
    /// When false, such reports admit their subject.
    pub filter: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self { filter: true }
    }
}

/// Initial watchlist.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct WatchlistConfig {
    pub subjects: Vec<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
