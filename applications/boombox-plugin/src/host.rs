//! Game host collaborator
//!
//! The host owns players, items and the event bus. It calls the
//! `BoomboxPlugin` handlers and receives hints and world effects through
//! [`Host`].

use boombox_playback::{AttachPoint, EntityId, PlayerId};
use std::time::Duration;

/// Callbacks into the game host
pub trait Host: Send + Sync {
    /// Show a short on-screen text to one player
    fn show_hint(&self, player: &PlayerId, text: &str, duration: Duration);

    /// Neutralise the native radio of a boombox: off, full battery, Short range
    fn prepare_radio(&self, entity: EntityId);

    /// Shake the facility (easter egg)
    fn shake_facility(&self);
}

/// Player taking part in an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub nickname: String,
}

impl PlayerRef {
    pub fn new(id: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(id),
            nickname: nickname.into(),
        }
    }
}

/// Item a player is currently holding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeldItem {
    pub entity: EntityId,

    /// Whether the radio is switched on
    pub radio_on: bool,
}

/// Boombox reported by the host at round start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedItem {
    pub entity: EntityId,

    /// Where the item currently is
    pub location: AttachPoint,
}

impl TrackedItem {
    pub fn pickup(entity: EntityId) -> Self {
        Self {
            entity,
            location: AttachPoint::Pickup(entity),
        }
    }

    pub fn held_by(entity: EntityId, player: PlayerId) -> Self {
        Self {
            entity,
            location: AttachPoint::Holder(player),
        }
    }
}

/// Answer to a cancellable host event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny,
}

impl Verdict {
    pub fn is_allowed(self) -> bool {
        self == Verdict::Allow
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceChannel {
    Proximity,
    Radio,
    Intercom,
    Spectator,
}

/// Host that writes every callback to the log
#[derive(Debug, Default)]
pub struct LogHost;

impl Host for LogHost {
    fn show_hint(&self, player: &PlayerId, text: &str, duration: Duration) {
        tracing::info!("Hint for {} ({:?}): {}", player, duration, text);
    }

    fn prepare_radio(&self, entity: EntityId) {
        tracing::debug!("Prepared radio of {}", entity);
    }

    fn shake_facility(&self) {
        tracing::info!("The facility shakes");
    }
}
