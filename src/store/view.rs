//! Bounded history of one observer's observations about one subject.
//!
//! # Design Decisions
//! - Capacity-capped `VecDeque`: append at the tail, evict from the head
//! - The bound is passed in on every push so a runtime retention change
//!   takes effect without rebuilding views

use std::collections::VecDeque;

use crate::store::types::{EntityId, Observation};

const PREALLOC_LIMIT: usize = 64;

/// Observations from `observer` about `subject`, oldest first.
#[derive(Debug, Clone)]
pub struct View {
    pub(crate) observer: EntityId,
    pub(crate) subject: EntityId,
    observations: VecDeque<Observation>,
}

impl View {
    /// Create an empty view.
    pub(crate) fn new(observer: EntityId, subject: EntityId, capacity: usize) -> Self {
        Self {
            observer,
            subject,
            observations: VecDeque::with_capacity(capacity.saturating_add(1).min(PREALLOC_LIMIT)),
        }
    }

    /// Append an observation and evict the oldest ones beyond `max`.
    ///
    /// Returns the number of observations evicted.
    pub(crate) fn push(&mut self, observation: Observation, max: usize) -> usize {
        self.observations.push_back(observation);
        self.truncate_to(max)
    }

    /// Drop oldest observations until at most `max` remain.
    pub(crate) fn truncate_to(&mut self, max: usize) -> usize {
        let excess = self.observations.len().saturating_sub(max);
        self.observations.drain(..excess);
        excess
    }

    pub fn observer(&self) -> &EntityId {
        &self.observer
    }

    pub fn subject(&self) -> &EntityId {
        &self.subject
    }

    /// The most recently appended observation.
    pub fn latest(&self) -> Option<&Observation> {
        self.observations.back()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }
}
