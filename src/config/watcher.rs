//! Hot reload of the configuration file.
//!
//! # Responsibilities
//! - Watch the config file and push validated reloads over a channel
//! - Hold the live configuration behind an `ArcSwap`
//! - Turn a reload into the minimal set of store updates
//!
//! # Design Decisions
//! - Only the retention bound and the watchlist are reloadable
//! - Subjects dropped from the file are muted, not cleaned: history survives
//! - A reload that fails to load or validate never reaches the channel

use arc_swap::ArcSwap;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::StoreConfig;
use crate::store::{EntityId, HealthStorage, ObservationStore};

/// Watches one config file and emits every valid new version.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<StoreConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end for reloaded configs.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<StoreConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. Dropping the returned watcher stops updates.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, update_tx } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    match load_config(&watched) {
                        Ok(config) => {
                            tracing::info!(path = ?watched, "Store config reloaded");
                            let _ = update_tx.send(config);
                        }
                        Err(e) => {
                            tracing::error!(path = ?watched, error = %e, "Ignoring invalid config reload");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;
        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}

/// Store updates implied by moving from one config to the next.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReloadPlan {
    pub retention: Option<usize>,
    pub admit: Vec<EntityId>,
    pub mute: Vec<EntityId>,
}

impl ReloadPlan {
    pub fn between(old: &StoreConfig, new: &StoreConfig) -> Self {
        let old_subjects: BTreeSet<&str> = old.watchlist.subjects.iter().map(String::as_str).collect();
        let new_subjects: BTreeSet<&str> = new.watchlist.subjects.iter().map(String::as_str).collect();

        let new_max = new.retention.max_reports_per_view;
        Self {
            retention: (new_max != old.retention.max_reports_per_view).then_some(new_max),
            admit: new_subjects.difference(&old_subjects).map(|s| EntityId::from(*s)).collect(),
            mute: old_subjects.difference(&new_subjects).map(|s| EntityId::from(*s)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.retention.is_none() && self.admit.is_empty() && self.mute.is_empty()
    }
}

/// The configuration currently in effect for a running store.
pub struct LiveConfig {
    current: ArcSwap<StoreConfig>,
}

impl LiveConfig {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(config),
        }
    }

    pub fn current(&self) -> Arc<StoreConfig> {
        self.current.load_full()
    }

    /// Swap in `new` and bring `store` in line with it.
    pub fn apply(&self, new: StoreConfig, store: &ObservationStore) -> ReloadPlan {
        let new = Arc::new(new);
        let old = self.current.swap(Arc::clone(&new));
        let plan = ReloadPlan::between(&old, &new);

        if let Some(max) = plan.retention {
            if let Err(e) = store.set_max_reports_per_view(max) {
                tracing::warn!(error = %e, "Retention bound not applied");
            }
        }
        for subject in &plan.admit {
            store.add_subject(subject.clone());
        }
        for subject in &plan.mute {
            store.remove_subject(subject, false);
        }

        if !plan.is_empty() {
            tracing::info!(
                retention = ?plan.retention,
                admitted = plan.admit.len(),
                muted = plan.mute.len(),
                "Applied config reload"
            );
        }
        plan
    }
}
