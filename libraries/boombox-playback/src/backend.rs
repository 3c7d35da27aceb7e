//! Audio collaborator trait
//!
//! Abstracts the host's audio player API (clip storage, spatial speakers,
//! clip playbacks) so sessions can be driven by any backend.

use crate::error::Result;
use crate::types::{EntityId, PlayerId, SpeakerSettings, Track};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Opaque handle of an audio player owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerHandle(pub u64);

/// Opaque handle of one clip playback on an audio player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipHandle(pub u64);

/// Game object an audio player's speakers are parented to
///
/// The speakers follow the boombox as it moves between the ground and a
/// player's hand. Drops and deaths surface as a new pickup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachPoint {
    /// The pickup lying in the world
    Pickup(EntityId),

    /// The player holding the item
    Holder(PlayerId),
}

/// Live state of a clip playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipStatus {
    /// Samples consumed so far
    pub read_position: u64,

    /// Total samples of the clip
    pub sample_length: u64,

    /// Whether the playback is paused
    pub paused: bool,

    /// Whether the playback restarts when it reaches the end
    pub looping: bool,
}

impl ClipStatus {
    /// Whether the read position reached the end of the clip
    pub fn is_finished(&self) -> bool {
        self.read_position >= self.sample_length
    }
}

/// Host audio player API
///
/// Implementors own every player and clip; sessions only keep handles.
pub trait AudioBackend: Send {
    /// Register the clip file of `name` found in the directory `path`
    fn load_track(&mut self, path: &Path, name: &Track) -> Result<()>;

    /// Create (or fetch) the audio player dedicated to an entity
    fn create_player(&mut self, entity: EntityId) -> Result<PlayerHandle>;

    /// Parent the player's speakers to a game object
    ///
    /// Called again whenever the entity moves to a new container.
    fn attach_player(
        &mut self,
        player: PlayerHandle,
        target: &AttachPoint,
        speakers: &SpeakerSettings,
    ) -> Result<()>;

    /// Start a clip playback
    fn add_clip(&mut self, player: PlayerHandle, track: &Track, looping: bool) -> Result<ClipHandle>;

    /// Stop and release a clip playback
    ///
    /// Removing an unknown clip is a no-op.
    fn remove_clip(&mut self, player: PlayerHandle, clip: ClipHandle);

    /// Current state of a clip, `None` when the backend no longer knows it
    fn clip_status(&self, player: PlayerHandle, clip: ClipHandle) -> Option<ClipStatus>;

    /// Pause or resume a clip
    fn set_paused(&mut self, player: PlayerHandle, clip: ClipHandle, paused: bool) -> Result<()>;

    /// Set the repeat flag of a clip while it plays
    fn set_looping(&mut self, player: PlayerHandle, clip: ClipHandle, looping: bool) -> Result<()>;
}
