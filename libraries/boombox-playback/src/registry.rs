//! Entity registry
//!
//! Maps item serials to their playback sessions. The registry is round
//! scoped: it is populated lazily as boomboxes are observed and cleared once
//! at every round end.

use crate::{
    backend::AudioBackend,
    error::PlaybackError,
    events::SessionEvent,
    playlist::PlaylistSet,
    session::{PlaybackSession, TickOutcome},
    shuffle::ShuffleSelector,
    types::EntityId,
};
use rand::Rng;
use std::collections::BTreeMap;

/// Result of one scan over every session
#[derive(Debug, Default)]
pub struct TickReport {
    /// Outcome of each session that ticked cleanly
    pub outcomes: Vec<(EntityId, TickOutcome)>,

    /// Sessions whose tick failed; the scan continued past them
    pub failures: Vec<(EntityId, PlaybackError)>,

    /// Events drained from every session during the scan
    pub events: Vec<SessionEvent>,
}

impl TickReport {
    /// Outcome recorded for an entity
    pub fn outcome(&self, entity: EntityId) -> Option<&TickOutcome> {
        self.outcomes
            .iter()
            .find(|(id, _)| *id == entity)
            .map(|(_, outcome)| outcome)
    }
}

/// Live sessions keyed by entity
#[derive(Debug, Default)]
pub struct EntityRegistry {
    sessions: BTreeMap<EntityId, PlaybackSession>,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            sessions: BTreeMap::new(),
        }
    }

    /// Session of `entity`, created from a fresh copy of `template` if absent
    pub fn get_or_create(&mut self, entity: EntityId, template: &PlaylistSet) -> &mut PlaybackSession {
        self.sessions.entry(entity).or_insert_with(|| {
            tracing::debug!("Tracking new session for {}", entity);
            PlaybackSession::new(entity, template.fresh_copy())
        })
    }

    /// Session of `entity`, never creates
    pub fn get(&self, entity: EntityId) -> Option<&PlaybackSession> {
        self.sessions.get(&entity)
    }

    /// Mutable session of `entity`, never creates
    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut PlaybackSession> {
        self.sessions.get_mut(&entity)
    }

    /// Whether `entity` is a tracked boombox
    pub fn contains(&self, entity: EntityId) -> bool {
        self.sessions.contains_key(&entity)
    }

    /// Stop tracking `entity`
    pub fn remove(&mut self, entity: EntityId) -> Option<PlaybackSession> {
        self.sessions.remove(&entity)
    }

    /// Drop every session, returns how many were tracked
    pub fn clear(&mut self) -> usize {
        let count = self.sessions.len();
        self.sessions.clear();
        count
    }

    /// Number of tracked sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if no session is tracked
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Tracked entities in ascending serial order
    pub fn entities(&self) -> Vec<EntityId> {
        self.sessions.keys().copied().collect()
    }

    /// Iterate every session mutably
    pub fn sessions_mut(&mut self) -> impl Iterator<Item = &mut PlaybackSession> {
        self.sessions.values_mut()
    }

    /// Run the end-of-track check on every session
    ///
    /// A failing session is logged and recorded; it never stops the scan.
    pub fn tick_all<R: Rng + ?Sized>(
        &mut self,
        selector: &mut ShuffleSelector,
        rng: &mut R,
        backend: &mut dyn AudioBackend,
    ) -> TickReport {
        let mut report = TickReport::default();

        for (entity, session) in &mut self.sessions {
            match session.tick(selector, rng, backend) {
                Ok(outcome) => report.outcomes.push((*entity, outcome)),
                Err(e) => {
                    tracing::error!("Tick failed for {}: {}", entity, e);
                    report.failures.push((*entity, e));
                }
            }
            report.events.extend(session.drain_events());
        }

        report
    }
}
