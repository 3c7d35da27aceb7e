//! Session Events
//!
//! Sessions queue events at every transition. The host side drains them to
//! log activity and to cancel timers tied to a track that stopped playing.

use crate::types::{Category, EntityId, LoopMode, Track};
use serde::{Deserialize, Serialize};

/// Events emitted by a playback session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A clip started on the entity's audio player
    TrackStarted {
        entity: EntityId,
        category: Category,
        track: Track,
        /// Whether the track came from a shuffle pick
        shuffled: bool,
    },

    /// The clip reached its end and nothing replaced it
    TrackFinished { entity: EntityId, track: Track },

    /// The clip was released (track change, stop or teardown)
    TrackStopped { entity: EntityId, track: Track },

    /// Playback paused mid-track
    Paused { entity: EntityId },

    /// Playback resumed
    Resumed { entity: EntityId },

    /// Active playlist changed
    CategoryChanged { entity: EntityId, category: Category },

    /// Loop mode cycled
    LoopModeChanged { entity: EntityId, mode: LoopMode },
}

impl SessionEvent {
    /// Entity the event belongs to
    pub fn entity(&self) -> EntityId {
        match self {
            SessionEvent::TrackStarted { entity, .. }
            | SessionEvent::TrackFinished { entity, .. }
            | SessionEvent::TrackStopped { entity, .. }
            | SessionEvent::Paused { entity }
            | SessionEvent::Resumed { entity }
            | SessionEvent::CategoryChanged { entity, .. }
            | SessionEvent::LoopModeChanged { entity, .. } => *entity,
        }
    }

    /// Whether the previously audible track is no longer playing
    pub fn ends_playback(&self) -> bool {
        matches!(
            self,
            SessionEvent::TrackFinished { .. }
                | SessionEvent::TrackStopped { .. }
                | SessionEvent::Paused { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_pause_and_finish_end_playback() {
        let entity = EntityId::new(3);
        let track = Track::new("song");

        assert!(SessionEvent::Paused { entity }.ends_playback());
        assert!(SessionEvent::TrackStopped {
            entity,
            track: track.clone()
        }
        .ends_playback());
        assert!(SessionEvent::TrackFinished {
            entity,
            track: track.clone()
        }
        .ends_playback());
        assert!(!SessionEvent::Resumed { entity }.ends_playback());
        assert!(!SessionEvent::TrackStarted {
            entity,
            category: Category::Short,
            track,
            shuffled: false,
        }
        .ends_playback());
    }

    #[test]
    fn entity_accessor() {
        let event = SessionEvent::LoopModeChanged {
            entity: EntityId::new(42),
            mode: LoopMode::ShuffleAll,
        };
        assert_eq!(event.entity(), EntityId::new(42));
    }
}
