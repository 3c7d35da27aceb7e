//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::fmt;

/// File extension the audio collaborator loads clips from
pub const TRACK_EXTENSION: &str = ".ogg";

/// Identifier of a tracked boombox (the item serial)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u16);

impl EntityId {
    /// Create a new entity ID from an item serial
    pub const fn new(serial: u16) -> Self {
        Self(serial)
    }

    /// Get the item serial
    pub const fn serial(self) -> u16 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Boombox({})", self.0)
    }
}

/// Player identifier as issued by the host (e.g. `76561198000000000@steam`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a new player ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a playable audio clip
///
/// Configuration lists file names (`song.ogg`) while the audio collaborator
/// registers clips by stem, so the extension is stripped on construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Track(String);

impl Track {
    /// Create a track name, dropping a trailing `.ogg`
    pub fn new(name: impl Into<String>) -> Self {
        let mut name = name.into();
        if let Some(stem) = name.strip_suffix(TRACK_EXTENSION) {
            name.truncate(stem.len());
        }
        Self(name)
    }

    /// Get the clip name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the clip on disk
    pub fn file_name(&self) -> String {
        format!("{}{}", self.0, TRACK_EXTENSION)
    }
}

impl From<String> for Track {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&str> for Track {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<Track> for String {
    fn from(track: Track) -> Self {
        track.0
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Playlist bucket, tied to the radio range setting of the item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[serde(alias = "Short")]
    Short,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "Long")]
    Long,
    #[serde(alias = "Ultra")]
    Ultra,
}

impl Category {
    /// All categories in radio-range order
    pub const ALL: [Category; 4] = [
        Category::Short,
        Category::Medium,
        Category::Long,
        Category::Ultra,
    ];

    /// Position of the category in [`Category::ALL`]
    pub const fn index(self) -> usize {
        match self {
            Category::Short => 0,
            Category::Medium => 1,
            Category::Long => 2,
            Category::Ultra => 3,
        }
    }

    /// Display name, also used as the default playlist name
    pub const fn name(self) -> &'static str {
        match self {
            Category::Short => "Short",
            Category::Medium => "Medium",
            Category::Long => "Long",
            Category::Ultra => "Ultra",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Loop mode
///
/// Cycles `Off -> RepeatOne -> CyclePlaylist -> ShuffleAll -> Off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoopMode {
    /// Track plays once, then the boombox goes idle
    #[default]
    Off,

    /// Current track repeats (handled by the audio collaborator)
    RepeatOne,

    /// Advance through the active playlist
    CyclePlaylist,

    /// Pick a random track from every playlist
    ShuffleAll,
}

impl LoopMode {
    /// Next mode in the cycle
    pub const fn next(self) -> Self {
        match self {
            LoopMode::Off => LoopMode::RepeatOne,
            LoopMode::RepeatOne => LoopMode::CyclePlaylist,
            LoopMode::CyclePlaylist => LoopMode::ShuffleAll,
            LoopMode::ShuffleAll => LoopMode::Off,
        }
    }

    /// Whether clips started in this mode carry the repeat flag
    pub const fn repeats_track(self) -> bool {
        matches!(self, LoopMode::RepeatOne)
    }

    /// Human readable label for hints and command responses
    pub const fn label(self) -> &'static str {
        match self {
            LoopMode::Off => "Off",
            LoopMode::RepeatOne => "Repeat Song",
            LoopMode::CyclePlaylist => "Cycle Playlist",
            LoopMode::ShuffleAll => "Shuffle All",
        }
    }
}

impl fmt::Display for LoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which track of the active playlist to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Replay the track under the cursor
    Current,

    /// Advance the cursor
    Next,

    /// Move the cursor back
    Previous,
}

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// No track loaded
    #[default]
    Idle,

    /// Clip playing
    Playing,

    /// Clip paused mid-track
    Paused,
}

/// Speaker tuning applied when an audio player is attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerSettings {
    /// Volume of each speaker, `0.0..=1.0`
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Duplicate speakers make the boombox louder
    #[serde(default = "default_count")]
    pub count: u32,

    /// Full volume within this distance
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,

    /// Silent past this distance
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
}

fn default_volume() -> f32 {
    1.0
}

fn default_count() -> u32 {
    1
}

fn default_min_distance() -> f32 {
    1.0
}

fn default_max_distance() -> f32 {
    30.0
}

impl Default for SpeakerSettings {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            count: default_count(),
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
        }
    }
}
