//! Point-in-time copy of the store for human inspection.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::store::panorama::Panorama;
use crate::store::types::{EntityId, Observation};

/// Copy of every subject's views, keyed and sorted by subject.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreSnapshot {
    pub subjects: BTreeMap<EntityId, SubjectSnapshot>,
}

/// Copy of one subject's panorama.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubjectSnapshot {
    /// Whether the subject was on the watchlist when copied.
    pub watched: bool,
    /// Observer -> observations, oldest first.
    pub views: BTreeMap<EntityId, Vec<Observation>>,
}

impl SubjectSnapshot {
    pub fn from_panorama(panorama: &Panorama, watched: bool) -> Self {
        let views = panorama
            .views
            .iter()
            .map(|(observer, view)| (observer.clone(), view.iter().cloned().collect()))
            .collect();
        Self { watched, views }
    }
}

impl StoreSnapshot {
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

impl fmt::Display for StoreSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (subject, snapshot) in &self.subjects {
            writeln!(f, "============={}=============", subject)?;
            for (observer, observations) in &snapshot.views {
                writeln!(
                    f,
                    "{} observations for {}->{}",
                    observations.len(),
                    observer,
                    subject
                )?;
                for obs in observations {
                    writeln!(f, "|{}| {}", observer, obs)?;
                }
            }
        }
        Ok(())
    }
}
