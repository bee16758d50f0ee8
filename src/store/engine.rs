//! In-memory observation store.
//!
//! # Responsibilities
//! - Maintain the watchlist and gate report admission
//! - Create per-subject locks and panoramas on demand
//! - Append observations and enforce the per-view retention bound
//! - Answer panorama, latest-report and snapshot queries
//!
//! # Locking
//! The store-wide lock guards only the registry (watchlist + tenants). Every
//! operation that touches panorama contents looks up the handle under the
//! store-wide lock, releases it, and only then locks the subject. No code path
//! holds both at once.
//!
//! A clean removal drops the registry's handle. Callers that already cloned it
//! keep a valid (but orphaned) panorama; a report racing with the removal may
//! land there and be discarded with it.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::StoreConfig;
use crate::observability::metrics;
use crate::store::panorama::{Panorama, PanoramaHandle};
use crate::store::snapshot::{StoreSnapshot, SubjectSnapshot};
use crate::store::types::{EntityId, Report, ReportOutcome, StoreError, StoreResult};
use crate::store::view::View;
use crate::store::{HealthStorage, DEFAULT_MAX_REPORTS_PER_VIEW};

/// Membership maps guarded by the store-wide lock.
#[derive(Debug, Default)]
struct Registry {
    watchlist: HashSet<EntityId>,
    tenants: HashMap<EntityId, PanoramaHandle>,
}

impl Registry {
    /// Return the subject's handle, creating lock and panorama if absent.
    fn ensure_panorama(&mut self, subject: &EntityId) -> PanoramaHandle {
        self.tenants
            .entry(subject.clone())
            .or_insert_with(|| Panorama::handle(subject.clone()))
            .clone()
    }
}

/// Thread-safe store of recent observations per subject and observer.
#[derive(Debug)]
pub struct ObservationStore {
    registry: Mutex<Registry>,
    max_reports_per_view: AtomicUsize,
}

impl ObservationStore {
    /// Create an empty store. A zero bound is raised to 1.
    pub fn new(max_reports_per_view: usize) -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            max_reports_per_view: AtomicUsize::new(max_reports_per_view.max(1)),
        }
    }

    /// Create a store that already watches `subjects`.
    pub fn with_subjects<I, S>(max_reports_per_view: usize, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EntityId>,
    {
        let store = Self::new(max_reports_per_view);
        {
            let mut registry = store.registry();
            for subject in subjects {
                let subject = subject.into();
                registry.ensure_panorama(&subject);
                registry.watchlist.insert(subject);
            }
            metrics::record_watchlist_size(registry.watchlist.len());
        }
        store
    }

    /// Create a store from the retention and watchlist sections of `config`.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::with_subjects(
            config.retention.max_reports_per_view,
            config.watchlist.subjects.iter().map(String::as_str),
        )
    }

    /// Current retention bound.
    pub fn max_reports_per_view(&self) -> usize {
        self.max_reports_per_view.load(Ordering::SeqCst)
    }

    /// Change the retention bound, truncating existing views if it shrinks.
    ///
    /// Returns the number of observations evicted.
    pub fn set_max_reports_per_view(&self, max: usize) -> StoreResult<usize> {
        if max == 0 {
            return Err(StoreError::InvalidRetention(max));
        }
        let previous = self.max_reports_per_view.swap(max, Ordering::SeqCst);
        if max >= previous {
            tracing::info!(previous, max, "Retention bound raised");
            return Ok(0);
        }

        let handles: Vec<PanoramaHandle> = self.registry().tenants.values().cloned().collect();
        let mut evicted = 0;
        for handle in handles {
            let mut panorama = lock_panorama(&handle);
            for view in panorama.views.values_mut() {
                evicted += view.truncate_to(max);
            }
        }
        metrics::record_evictions(evicted);
        tracing::info!(previous, max, evicted, "Retention bound lowered");
        Ok(evicted)
    }

    /// Whether `subject` is on the watchlist.
    pub fn is_watched(&self, subject: &EntityId) -> bool {
        self.registry().watchlist.contains(subject)
    }

    /// Watched subjects, sorted.
    pub fn watchlist(&self) -> Vec<EntityId> {
        let mut subjects: Vec<EntityId> = self.registry().watchlist.iter().cloned().collect();
        subjects.sort();
        subjects
    }

    /// Number of subjects with stored panoramas, watched or not.
    pub fn subject_count(&self) -> usize {
        self.registry().tenants.len()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ObservationStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REPORTS_PER_VIEW)
    }
}

fn lock_panorama(handle: &PanoramaHandle) -> MutexGuard<'_, Panorama> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HealthStorage for ObservationStore {
    fn add_subject(&self, subject: EntityId) -> bool {
        let mut registry = self.registry();
        registry.ensure_panorama(&subject);
        let added = registry.watchlist.insert(subject.clone());
        if added {
            metrics::record_watchlist_size(registry.watchlist.len());
            tracing::info!(subject = %subject, "Subject added to watchlist");
        }
        added
    }

    fn remove_subject(&self, subject: &EntityId, clean: bool) -> bool {
        let mut registry = self.registry();
        let was_watched = registry.watchlist.remove(subject);
        if clean {
            registry.tenants.remove(subject);
        }
        metrics::record_watchlist_size(registry.watchlist.len());
        tracing::info!(subject = %subject, clean, was_watched, "Subject removed from watchlist");
        was_watched
    }

    fn add_report(&self, report: Report, filter: bool) -> StoreResult<ReportOutcome> {
        let handle = {
            let mut registry = self.registry();
            if !registry.watchlist.contains(&report.subject) {
                if filter {
                    tracing::info!(
                        subject = %report.subject,
                        observer = %report.observer,
                        "Subject not in watchlist, ignoring report"
                    );
                    metrics::record_report(ReportOutcome::Ignored);
                    return Ok(ReportOutcome::Ignored);
                }
                registry.watchlist.insert(report.subject.clone());
                metrics::record_watchlist_size(registry.watchlist.len());
                tracing::info!(subject = %report.subject, "Subject admitted by unfiltered report");
            }
            registry.ensure_panorama(&report.subject)
        };

        tracing::debug!(
            subject = %report.subject,
            observer = %report.observer,
            timestamp_ms = report.observation.timestamp_ms,
            "Adding report"
        );

        let mut panorama = lock_panorama(&handle);
        let max = self.max_reports_per_view();
        let Report {
            observer,
            subject,
            observation,
        } = report;

        let view = match panorama.views.entry(observer) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                tracing::debug!(subject = %subject, observer = %entry.key(), "Creating view");
                metrics::record_view_created();
                let observer = entry.key().clone();
                entry.insert(View::new(observer, subject.clone(), max))
            }
        };

        let evicted = view.push(observation, max);
        if evicted > 0 {
            tracing::debug!(
                subject = %subject,
                observer = %view.observer,
                evicted,
                "Truncated view"
            );
            metrics::record_evictions(evicted);
        }

        metrics::record_report(ReportOutcome::Accepted);
        Ok(ReportOutcome::Accepted)
    }

    fn get_panorama(&self, subject: &EntityId) -> Option<PanoramaHandle> {
        let registry = self.registry();
        if !registry.watchlist.contains(subject) {
            return None;
        }
        registry.tenants.get(subject).cloned()
    }

    fn get_latest_report(&self, subject: &EntityId) -> Option<Report> {
        let handle = self.registry().tenants.get(subject).cloned()?;
        let panorama = lock_panorama(&handle);
        panorama.latest().map(|(observer, observation)| Report {
            observer: observer.clone(),
            subject: subject.clone(),
            observation: observation.clone(),
        })
    }

    fn snapshot(&self) -> StoreSnapshot {
        let (handles, watchlist) = {
            let registry = self.registry();
            let handles: Vec<(EntityId, PanoramaHandle)> = registry
                .tenants
                .iter()
                .map(|(subject, handle)| (subject.clone(), handle.clone()))
                .collect();
            (handles, registry.watchlist.clone())
        };

        let mut snapshot = StoreSnapshot::default();
        for (subject, handle) in handles {
            let panorama = lock_panorama(&handle);
            let watched = watchlist.contains(&subject);
            snapshot
                .subjects
                .insert(subject, SubjectSnapshot::from_panorama(&panorama, watched));
        }
        snapshot
    }
}
