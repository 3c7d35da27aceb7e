//! Shuffle selection across every playlist
//!
//! Shuffle ignores the active category: the pick is uniform over the union of
//! all tracks, so a category with more tracks is picked proportionally more.

use crate::error::{PlaybackError, Result};
use crate::playlist::PlaylistSet;
use crate::types::{Category, Track};
use rand::Rng;

/// One entry of the flattened catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShufflePick {
    /// Category holding the track
    pub category: Category,

    /// Index of the track in that category's playlist
    pub index: usize,

    /// The picked track
    pub track: Track,
}

/// Uniform random track selector
///
/// The flattened catalog is built once and cached until [`invalidate`] or
/// [`rebuild`] is called (at round start).
///
/// [`invalidate`]: ShuffleSelector::invalidate
/// [`rebuild`]: ShuffleSelector::rebuild
#[derive(Debug, Clone, Default)]
pub struct ShuffleSelector {
    catalog: Option<Vec<ShufflePick>>,
}

impl ShuffleSelector {
    /// Create a selector with no cached catalog
    pub fn new() -> Self {
        Self { catalog: None }
    }

    /// Flatten every `(category, index, track)` of `set` into the cache
    pub fn rebuild(&mut self, set: &PlaylistSet) {
        let catalog: Vec<ShufflePick> = set
            .iter()
            .flat_map(|(category, playlist)| {
                playlist
                    .tracks()
                    .iter()
                    .enumerate()
                    .map(move |(index, track)| ShufflePick {
                        category,
                        index,
                        track: track.clone(),
                    })
            })
            .collect();

        tracing::debug!("Shuffle catalog rebuilt with {} track(s)", catalog.len());
        self.catalog = Some(catalog);
    }

    /// Drop the cached catalog
    pub fn invalidate(&mut self) {
        self.catalog = None;
    }

    /// Number of cached entries, `None` when not built
    pub fn catalog_len(&self) -> Option<usize> {
        self.catalog.as_ref().map(Vec::len)
    }

    /// Pick a uniformly random track
    ///
    /// Builds the catalog from `set` when none is cached.
    pub fn pick<R: Rng + ?Sized>(&mut self, set: &PlaylistSet, rng: &mut R) -> Result<ShufflePick> {
        if self.catalog.is_none() {
            self.rebuild(set);
        }

        let catalog = self.catalog.as_deref().unwrap_or_default();
        if catalog.is_empty() {
            return Err(PlaybackError::NoTracksAvailable);
        }

        let index = rng.gen_range(0..catalog.len());
        Ok(catalog[index].clone())
    }
}
