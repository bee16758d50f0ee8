//! Core data model and error definitions for the observation store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Identifier naming a subject or an observer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Status an observer assigns to one metric of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Init,
    Normal,
    Slow,
    Unhealthy,
    Dead,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthStatus::Init => "init",
            HealthStatus::Normal => "normal",
            HealthStatus::Slow => "slow",
            HealthStatus::Unhealthy => "unhealthy",
            HealthStatus::Dead => "dead",
        };
        f.write_str(s)
    }
}

/// A single named health metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub status: HealthStatus,
    pub score: f32,
}

/// Metric name -> value. The store never interprets this payload.
pub type Metrics = BTreeMap<String, Metric>;

/// One timestamped health data point from an observer about a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Milliseconds since the Unix epoch, as stamped by the observer.
    pub timestamp_ms: u64,
    #[serde(default)]
    pub metrics: Metrics,
}

impl Observation {
    /// Create an observation with no metrics.
    pub fn new(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            metrics: Metrics::new(),
        }
    }

    /// Attach a metric (builder style).
    pub fn with_metric(mut self, name: impl Into<String>, status: HealthStatus, score: f32) -> Self {
        self.metrics.insert(name.into(), Metric { status, score });
        self
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.timestamp_ms)?;
        for (i, (name, metric)) in self.metrics.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {}: {} {:.2}", name, metric.status, metric.score)?;
        }
        write!(f, " }}")
    }
}

/// An observation in flight from an observer to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub observer: EntityId,
    pub subject: EntityId,
    pub observation: Observation,
}

impl Report {
    pub fn new(observer: impl Into<EntityId>, subject: impl Into<EntityId>, observation: Observation) -> Self {
        Self {
            observer: observer.into(),
            subject: subject.into(),
            observation,
        }
    }
}

/// Result of submitting a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
    /// Subject not on the watchlist and filtering was requested.
    Ignored,
    /// Observation appended to the observer's view.
    Accepted,
    /// Reserved for a backing store that can fail; never produced in memory.
    Failed,
}

impl ReportOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportOutcome::Ignored => "ignored",
            ReportOutcome::Accepted => "accepted",
            ReportOutcome::Failed => "failed",
        }
    }
}

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing storage failed to record a report.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Retention bound must keep at least one observation.
    #[error("Invalid retention bound {0}: must be at least 1")]
    InvalidRetention(usize),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
