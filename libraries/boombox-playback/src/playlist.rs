//! Playlists keyed by category
//!
//! A [`Playlist`] is an ordered list of tracks with a circular cursor.
//! A [`PlaylistSet`] always holds exactly one playlist per [`Category`].

use crate::error::{PlaybackError, Result};
use crate::types::{Category, Track};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered tracks with a navigation cursor
///
/// Invariant: `cursor < max(1, tracks.len())`. The cursor is runtime state and
/// is never serialized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Playlist {
    /// Playlist name shown in hints
    #[serde(default)]
    pub name: String,

    /// Tracks in play order
    #[serde(default, alias = "songs")]
    tracks: Vec<Track>,

    #[serde(skip)]
    cursor: usize,
}

impl Playlist {
    /// Create a playlist with the cursor on the first track
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        Self {
            name: name.into(),
            tracks,
            cursor: 0,
        }
    }

    /// Create an empty playlist
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Advance the cursor circularly
    ///
    /// Returns `None` without moving when the playlist is empty.
    pub fn next(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.tracks.len();
        self.tracks.get(self.cursor)
    }

    /// Move the cursor back circularly
    pub fn previous(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        self.cursor = self
            .cursor
            .checked_sub(1)
            .unwrap_or(self.tracks.len() - 1);
        self.tracks.get(self.cursor)
    }

    /// Track under the cursor, `None` when empty
    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.cursor)
    }

    /// Jump the cursor to `index`
    pub fn set_index(&mut self, index: usize) -> Result<&Track> {
        if index >= self.tracks.len() {
            return Err(PlaybackError::OutOfRange {
                index,
                len: self.tracks.len(),
            });
        }
        self.cursor = index;
        Ok(&self.tracks[index])
    }

    /// Cursor position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Tracks in play order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the playlist has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Copy of this playlist with the cursor back on the first track
    pub fn fresh_copy(&self) -> Self {
        Self::new(self.name.clone(), self.tracks.clone())
    }

    /// Keep only the tracks matching `keep`, returns the removed tracks
    ///
    /// The cursor goes back to the first track.
    pub fn retain<F>(&mut self, mut keep: F) -> Vec<Track>
    where
        F: FnMut(&Track) -> bool,
    {
        let (kept, removed): (Vec<Track>, Vec<Track>) = std::mem::take(&mut self.tracks)
            .into_iter()
            .partition(|track| keep(track));
        self.tracks = kept;
        self.cursor = 0;
        removed
    }

    /// Put back a cursor saved earlier, clamped to the playlist bounds
    fn restore_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.tracks.len().saturating_sub(1));
    }
}

/// One playlist per category
///
/// All four categories are always present, possibly empty. Each tracked
/// entity owns its own copy so navigation never leaks between boomboxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<Category, Playlist>",
    into = "BTreeMap<Category, Playlist>"
)]
pub struct PlaylistSet {
    playlists: [Playlist; 4],
}

impl PlaylistSet {
    /// Create a set with four empty playlists named after their category
    pub fn new() -> Self {
        Self {
            playlists: Category::ALL.map(|category| Playlist::empty(category.name())),
        }
    }

    /// Replace the playlist of a category
    ///
    /// An unnamed playlist takes the category name.
    pub fn with_playlist(mut self, category: Category, mut playlist: Playlist) -> Self {
        if playlist.name.is_empty() {
            playlist.name = category.name().to_string();
        }
        self.playlists[category.index()] = playlist;
        self
    }

    /// Playlist of a category
    pub fn get(&self, category: Category) -> &Playlist {
        &self.playlists[category.index()]
    }

    /// Mutable playlist of a category
    pub fn get_mut(&mut self, category: Category) -> &mut Playlist {
        &mut self.playlists[category.index()]
    }

    /// Iterate `(category, playlist)` mutably, in category order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Category, &mut Playlist)> {
        Category::ALL.into_iter().zip(self.playlists.iter_mut())
    }

    /// Iterate `(category, playlist)` pairs in category order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &Playlist)> {
        Category::ALL.into_iter().zip(self.playlists.iter())
    }

    /// Total number of tracks across every category
    pub fn total_tracks(&self) -> usize {
        self.playlists.iter().map(Playlist::len).sum()
    }

    /// Cursor of every category, in category order
    pub fn cursors(&self) -> [usize; 4] {
        [
            self.playlists[0].cursor,
            self.playlists[1].cursor,
            self.playlists[2].cursor,
            self.playlists[3].cursor,
        ]
    }

    /// Restore cursors captured with [`PlaylistSet::cursors`]
    pub fn restore_cursors(&mut self, cursors: [usize; 4]) {
        for (playlist, cursor) in self.playlists.iter_mut().zip(cursors) {
            playlist.restore_cursor(cursor);
        }
    }

    /// Deep copy with every cursor reset to the first track
    pub fn fresh_copy(&self) -> Self {
        Self {
            playlists: [
                self.playlists[0].fresh_copy(),
                self.playlists[1].fresh_copy(),
                self.playlists[2].fresh_copy(),
                self.playlists[3].fresh_copy(),
            ],
        }
    }
}

impl Default for PlaylistSet {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BTreeMap<Category, Playlist>> for PlaylistSet {
    fn from(map: BTreeMap<Category, Playlist>) -> Self {
        map.into_iter()
            .fold(Self::new(), |set, (category, playlist)| {
                set.with_playlist(category, playlist)
            })
    }
}

impl From<PlaylistSet> for BTreeMap<Category, Playlist> {
    fn from(set: PlaylistSet) -> Self {
        Category::ALL.into_iter().zip(set.playlists).collect()
    }
}
