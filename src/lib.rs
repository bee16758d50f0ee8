//! In-memory observation store for distributed health monitoring.
//!
//! Holds, per monitored subject, the most recent observations reported by
//! each observer, and answers freshness queries over them.

pub mod config;
pub mod observability;
pub mod replay;
pub mod store;

pub use config::schema::StoreConfig;
pub use store::{
    EntityId, HealthStorage, Observation, ObservationStore, PanoramaHandle, Report, ReportOutcome,
};
