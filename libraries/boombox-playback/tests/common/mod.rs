//! Common test utilities and fixtures

#![allow(dead_code)]

use boombox_playback::{
    AttachPoint, AudioBackend, Category, ClipHandle, ClipStatus, EntityId, PlaybackError,
    PlayerHandle, Playlist, PlaylistSet, Result, SpeakerSettings, Track,
};
use std::collections::HashMap;
use std::path::Path;

/// Clip length used by the mock, in samples
pub const CLIP_SAMPLES: u64 = 48_000;

#[derive(Debug, Clone)]
pub struct MockClip {
    pub player: PlayerHandle,
    pub track: Track,
    pub read_position: u64,
    pub paused: bool,
    pub looping: bool,
}

/// In-memory audio backend recording every call
#[derive(Debug, Default)]
pub struct MockBackend {
    next_id: u64,
    pub players: HashMap<PlayerHandle, EntityId>,
    pub attachments: Vec<(PlayerHandle, AttachPoint)>,
    pub clips: HashMap<ClipHandle, MockClip>,
    pub removed: Vec<Track>,
    pub added: Vec<Track>,
    pub fail_add_clip: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a player as the host would when a boombox is initialized
    pub fn player_for(&mut self, entity: EntityId) -> PlayerHandle {
        self.create_player(entity).unwrap()
    }

    /// Move every clip of `player` to its end
    pub fn finish_clips(&mut self, player: PlayerHandle) {
        for clip in self.clips.values_mut().filter(|c| c.player == player) {
            clip.read_position = CLIP_SAMPLES;
        }
    }

    /// Clips currently held by `player`
    pub fn clips_of(&self, player: PlayerHandle) -> Vec<&MockClip> {
        self.clips.values().filter(|c| c.player == player).collect()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl AudioBackend for MockBackend {
    fn load_track(&mut self, _path: &Path, _name: &Track) -> Result<()> {
        Ok(())
    }

    fn create_player(&mut self, entity: EntityId) -> Result<PlayerHandle> {
        let handle = PlayerHandle(self.next());
        self.players.insert(handle, entity);
        Ok(handle)
    }

    fn attach_player(
        &mut self,
        player: PlayerHandle,
        target: &AttachPoint,
        _speakers: &SpeakerSettings,
    ) -> Result<()> {
        self.attachments.push((player, target.clone()));
        Ok(())
    }

    fn add_clip(&mut self, player: PlayerHandle, track: &Track, looping: bool) -> Result<ClipHandle> {
        if self.fail_add_clip {
            return Err(PlaybackError::backend(format!("clip '{}' not loaded", track)));
        }
        let handle = ClipHandle(self.next());
        self.clips.insert(
            handle,
            MockClip {
                player,
                track: track.clone(),
                read_position: 0,
                paused: false,
                looping,
            },
        );
        self.added.push(track.clone());
        Ok(handle)
    }

    fn remove_clip(&mut self, _player: PlayerHandle, clip: ClipHandle) {
        if let Some(clip) = self.clips.remove(&clip) {
            self.removed.push(clip.track);
        }
    }

    fn clip_status(&self, _player: PlayerHandle, clip: ClipHandle) -> Option<ClipStatus> {
        self.clips.get(&clip).map(|c| ClipStatus {
            read_position: c.read_position,
            sample_length: CLIP_SAMPLES,
            paused: c.paused,
            looping: c.looping,
        })
    }

    fn set_paused(&mut self, _player: PlayerHandle, clip: ClipHandle, paused: bool) -> Result<()> {
        let clip = self
            .clips
            .get_mut(&clip)
            .ok_or_else(|| PlaybackError::backend("unknown clip"))?;
        clip.paused = paused;
        Ok(())
    }

    fn set_looping(&mut self, _player: PlayerHandle, clip: ClipHandle, looping: bool) -> Result<()> {
        let clip = self
            .clips
            .get_mut(&clip)
            .ok_or_else(|| PlaybackError::backend("unknown clip"))?;
        clip.looping = looping;
        Ok(())
    }
}

pub fn playlist(name: &str, tracks: &[&str]) -> Playlist {
    Playlist::new(name, tracks.iter().map(|t| Track::new(*t)).collect())
}

/// Short=["a","b"], Medium=[], Long=["c"], Ultra=[]
pub fn scenario_template() -> PlaylistSet {
    PlaylistSet::new()
        .with_playlist(Category::Short, playlist("Short Range", &["a", "b"]))
        .with_playlist(Category::Long, playlist("Long Range", &["c"]))
}
