//! Metrics collection.
//!
//! # Metrics
//! - `store_reports_total` (counter): submitted reports by outcome
//! - `store_observations_evicted_total` (counter): observations dropped by retention
//! - `store_views_created_total` (counter): new (observer, subject) views
//! - `store_watchlist_size` (gauge): subjects currently watched
//!
//! # Design Decisions
//! - No exporter here; the process embedding the store installs a recorder
//! - Labels kept to the outcome only, subject ids would be unbounded

use crate::store::ReportOutcome;

/// Count a submitted report.
pub fn record_report(outcome: ReportOutcome) {
    metrics::counter!("store_reports_total", "outcome" => outcome.as_str()).increment(1);
}

/// Count observations evicted from views.
pub fn record_evictions(count: usize) {
    if count > 0 {
        metrics::counter!("store_observations_evicted_total").increment(count as u64);
    }
}

/// Count a newly created view.
pub fn record_view_created() {
    metrics::counter!("store_views_created_total").increment(1);
}

/// Record the current watchlist size.
pub fn record_watchlist_size(size: usize) {
    metrics::gauge!("store_watchlist_size").set(size as f64);
}
