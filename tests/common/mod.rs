//! Shared helpers for integration tests.

use observation_store::store::{HealthStatus, Observation, Report};
use observation_store::{EntityId, HealthStorage, ObservationStore};

/// Report with a single `liveness` metric.
pub fn report(observer: &str, subject: &str, timestamp_ms: u64) -> Report {
    Report::new(
        observer,
        subject,
        Observation::new(timestamp_ms).with_metric("liveness", HealthStatus::Normal, 1.0),
    )
}

/// Timestamps held in `observer`'s view of a watched `subject`, oldest first.
#[allow(dead_code)]
pub fn view_timestamps(store: &ObservationStore, subject: &str, observer: &str) -> Vec<u64> {
    let Some(handle) = store.get_panorama(&subject.into()) else {
        return Vec::new();
    };
    let panorama = handle.lock().unwrap();
    let timestamps = panorama
        .view(&EntityId::from(observer))
        .map(|view| view.iter().map(|o| o.timestamp_ms).collect())
        .unwrap_or_default();
    timestamps
}
