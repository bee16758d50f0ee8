//! All observers' views of one subject.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::store::types::{EntityId, Observation};
use crate::store::view::View;

/// Per-subject lock together with the data it guards.
///
/// Callers that receive a handle from the store must lock it before
/// reading the views.
pub type PanoramaHandle = Arc<Mutex<Panorama>>;

/// Observer -> view map for a single subject.
///
/// Read-only outside the store: views are created and appended to only by
/// ingestion, which keeps each view keyed by its own observer and bounded.
#[derive(Debug, Clone)]
pub struct Panorama {
    pub(crate) subject: EntityId,
    pub(crate) views: HashMap<EntityId, View>,
}

impl Panorama {
    /// Create a panorama with no views.
    pub(crate) fn new(subject: EntityId) -> Self {
        Self {
            subject,
            views: HashMap::new(),
        }
    }

    /// Wrap a fresh panorama in its per-subject lock.
    pub(crate) fn handle(subject: EntityId) -> PanoramaHandle {
        Arc::new(Mutex::new(Self::new(subject)))
    }

    pub fn subject(&self) -> &EntityId {
        &self.subject
    }

    /// Observer -> view.
    pub fn views(&self) -> &HashMap<EntityId, View> {
        &self.views
    }

    pub fn view(&self, observer: &EntityId) -> Option<&View> {
        self.views.get(observer)
    }

    /// Latest observation across every view, with the observer that made it.
    ///
    /// Exact timestamp ties resolve to whichever view is visited first;
    /// `HashMap` order makes that unspecified.
    pub fn latest(&self) -> Option<(&EntityId, &Observation)> {
        let mut best: Option<(&EntityId, &Observation)> = None;
        for (observer, view) in &self.views {
            let Some(candidate) = view.latest() else {
                continue;
            };
            match best {
                Some((_, current)) if current.timestamp_ms >= candidate.timestamp_ms => {}
                _ => best = Some((observer, candidate)),
            }
        }
        best
    }

    /// Total observations held across all views.
    pub fn observation_count(&self) -> usize {
        self.views.values().map(View::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(p: &mut Panorama, observer: &str, ts: u64) {
        let subject = p.subject.clone();
        p.views
            .entry(observer.into())
            .or_insert_with(|| View::new(observer.into(), subject, 5))
            .push(Observation::new(ts), 5);
    }

    #[test]
    fn test_latest_across_observers() {
        let mut p = Panorama::new("s".into());
        push(&mut p, "a", 20);
        push(&mut p, "b", 10);
        push(&mut p, "b", 30);
        push(&mut p, "a", 25);

        let (observer, obs) = p.latest().unwrap();
        assert_eq!(observer.as_str(), "b");
        assert_eq!(obs.timestamp_ms, 30);
        assert_eq!(p.observation_count(), 4);
    }

    #[test]
    fn test_latest_uses_tail_not_max() {
        let mut p = Panorama::new("s".into());
        push(&mut p, "a", 50);
        push(&mut p, "a", 5);
        push(&mut p, "b", 20);

        // a's tail is 5, so b wins even though a once reported 50
        let (observer, _) = p.latest().unwrap();
        assert_eq!(observer.as_str(), "b");
    }

    #[test]
    fn test_latest_empty() {
        let p = Panorama::new("s".into());
        assert!(p.latest().is_none());
    }
}
