//! Boombox - Playback Management
//!
//! Host-agnostic playlist and playback state for boombox entities.
//!
//! This crate provides:
//! - Playlists with circular navigation, one per radio-range category
//! - Loop modes (Off, Repeat One, Cycle Playlist, Shuffle All)
//! - Uniform shuffle across every playlist
//! - Per-entity playback sessions with audio lifecycle hooks
//! - A round-scoped registry of sessions keyed by item serial
//!
//! # Architecture
//!
//! `boombox-playback` knows nothing about the game server:
//! - No event bus, no item model, no scheduler
//! - Audio is reached through the [`AudioBackend`] trait
//! - Randomness is injected, so shuffles are reproducible in tests
//!
//! The host drives sessions from its event callbacks and calls
//! [`EntityRegistry::tick_all`] on a fixed interval to react to clips that
//! reached their end.
//!
//! # Example: Navigating a playlist
//!
//! ```rust
//! use boombox_playback::{Category, Playlist, PlaylistSet, Track};
//!
//! let template = PlaylistSet::new().with_playlist(
//!     Category::Short,
//!     Playlist::new("Chill", vec![Track::new("a.ogg"), Track::new("b.ogg")]),
//! );
//!
//! // Each boombox works on its own copy
//! let mut copy = template.fresh_copy();
//! let short = copy.get_mut(Category::Short);
//! assert_eq!(short.next().map(|t| t.as_str()), Some("b"));
//! assert_eq!(short.next().map(|t| t.as_str()), Some("a"));
//! assert_eq!(template.get(Category::Short).cursor(), 0);
//! ```
//!
//! # Example: Loop modes
//!
//! ```rust
//! use boombox_playback::LoopMode;
//!
//! let mode = LoopMode::Off.next().next();
//! assert_eq!(mode, LoopMode::CyclePlaylist);
//! ```

mod backend;
mod error;
mod events;
mod playlist;
mod registry;
mod session;
mod shuffle;
pub mod types;

// Public exports
pub use backend::{AttachPoint, AudioBackend, ClipHandle, ClipStatus, PlayerHandle};
pub use error::{PlaybackError, Result};
pub use events::SessionEvent;
pub use playlist::{Playlist, PlaylistSet};
pub use registry::{EntityRegistry, TickReport};
pub use session::{PlaybackSession, TickOutcome, TrackChange};
pub use shuffle::{ShufflePick, ShuffleSelector};
pub use types::{
    Category, Direction, EntityId, LoopMode, PlayerId, SessionState, SpeakerSettings, Track,
};
