//! Error types for playback management

use crate::types::{Category, EntityId};
use thiserror::Error;

/// Playback errors
///
/// Every variant is local to a single session. None of them is fatal to the
/// host; callers log and skip the failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Navigation attempted on a category without tracks
    #[error("No tracks in the {0} playlist")]
    EmptyPlaylist(Category),

    /// Playlist index outside `0..len`
    #[error("Index {index} out of range for playlist of {len} track(s)")]
    OutOfRange { index: usize, len: usize },

    /// Shuffle requested while every playlist is empty
    #[error("No tracks available in any playlist")]
    NoTracksAvailable,

    /// The entity has no attached audio player
    #[error("No audio player attached to {0}")]
    NoAudioBackend(EntityId),

    /// No session is tracked for the entity
    #[error("No session tracked for {0}")]
    UnknownEntity(EntityId),

    /// The audio collaborator rejected a request
    #[error("Audio backend error: {0}")]
    AudioBackend(String),
}

impl PlaybackError {
    /// Create an audio backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::AudioBackend(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
