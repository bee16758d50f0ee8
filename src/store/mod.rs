//! Observation storage subsystem.
//!
//! # Data Flow
//! ```text
//! Ingestion:
//!     Report (observer, subject, observation)
//!     → engine.rs: watchlist check under the store-wide lock
//!     → create per-subject lock + panorama if needed, release store-wide lock
//!     → per-subject lock: append to view.rs, evict oldest beyond the bound
//!
//! Queries:
//!     get_panorama      → handle (per-subject lock owning the panorama)
//!     get_latest_report → per-subject lock → scan view tails (panorama.rs)
//!     snapshot / dump   → snapshot.rs, one subject locked at a time
//! ```
//!
//! # Design Decisions
//! - Two lock tiers: one store-wide lock for membership, one lock per subject
//!   for panorama contents
//! - Locks are handed off, never nested, so unrelated subjects never contend
//!   beyond a brief map lookup
//! - The per-subject lock owns its panorama, so a lock always outlives the
//!   data it protects

pub mod engine;
pub mod panorama;
pub mod snapshot;
pub mod types;
pub mod view;

pub use engine::ObservationStore;
pub use panorama::{Panorama, PanoramaHandle};
pub use snapshot::{StoreSnapshot, SubjectSnapshot};
pub use types::{
    EntityId, HealthStatus, Metric, Metrics, Observation, Report, ReportOutcome, StoreError,
    StoreResult,
};
pub use view::View;

/// Default number of observations kept per (observer, subject) view.
pub const DEFAULT_MAX_REPORTS_PER_VIEW: usize = 5;

/// Interface consumed by the ingestion and query paths.
pub trait HealthStorage: Send + Sync {
    /// Put a subject on the watchlist. Returns true if it was not watched before.
    fn add_subject(&self, subject: EntityId) -> bool;

    /// Take a subject off the watchlist, discarding its history if `clean`.
    /// Returns true if the subject had been watched.
    fn remove_subject(&self, subject: &EntityId, clean: bool) -> bool;

    /// Store a report. With `filter`, reports about unwatched subjects are ignored;
    /// without it they admit the subject.
    fn add_report(&self, report: Report, filter: bool) -> StoreResult<ReportOutcome>;

    /// Handle to a watched subject's panorama. Lock it before reading.
    fn get_panorama(&self, subject: &EntityId) -> Option<PanoramaHandle>;

    /// Most recent report about `subject` across all observers.
    fn get_latest_report(&self, subject: &EntityId) -> Option<Report>;

    /// Copy every subject's views.
    fn snapshot(&self) -> StoreSnapshot;

    /// Human-readable rendering of [`HealthStorage::snapshot`].
    fn dump(&self) -> String {
        self.snapshot().to_string()
    }
}
