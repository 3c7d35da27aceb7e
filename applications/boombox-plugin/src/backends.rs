//! In-process audio backend
//!
//! Keeps clips as sample counters that advance on demand. Used by the
//! `simulate` command and by tests that need real clip lifetimes.

use boombox_playback::{
    AttachPoint, AudioBackend, ClipHandle, ClipStatus, EntityId, PlaybackError, PlayerHandle,
    Result, SpeakerSettings, Track,
};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const SAMPLE_RATE: u64 = 48_000;

#[derive(Debug, Clone)]
struct SimPlayer {
    entity: EntityId,
    attached_to: Option<AttachPoint>,
}

#[derive(Debug, Clone)]
struct SimClip {
    player: PlayerHandle,
    track: Track,
    read_position: u64,
    sample_length: u64,
    paused: bool,
    looping: bool,
}

#[derive(Debug)]
pub struct SimulatedBackend {
    clip_length: u64,
    loaded: HashMap<Track, u64>,
    players: HashMap<PlayerHandle, SimPlayer>,
    clips: HashMap<ClipHandle, SimClip>,
    next_handle: u64,
    log: bool,
}

impl SimulatedBackend {
    /// Every loaded clip lasts `clip_length`
    pub fn new(clip_length: Duration) -> Self {
        Self {
            clip_length: (clip_length.as_secs_f64() * SAMPLE_RATE as f64) as u64,
            loaded: HashMap::new(),
            players: HashMap::new(),
            clips: HashMap::new(),
            next_handle: 0,
            log: false,
        }
    }

    /// Log every call at debug level
    pub fn with_logging(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// Play `elapsed` worth of samples on every unpaused clip
    ///
    /// Looping clips wrap around; others stop at their end.
    pub fn advance(&mut self, elapsed: Duration) {
        let samples = (elapsed.as_secs_f64() * SAMPLE_RATE as f64) as u64;
        for clip in self.clips.values_mut().filter(|clip| !clip.paused) {
            let position = clip.read_position + samples;
            clip.read_position = if clip.looping && clip.sample_length > 0 {
                position % clip.sample_length
            } else {
                position.min(clip.sample_length)
            };
        }
    }

    pub fn is_loaded(&self, track: &Track) -> bool {
        self.loaded.contains_key(track)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Where the speakers of `player` are parented
    pub fn attachment(&self, player: PlayerHandle) -> Option<&AttachPoint> {
        self.players.get(&player)?.attached_to.as_ref()
    }

    /// Tracks currently playing on `player`
    pub fn playing(&self, player: PlayerHandle) -> Vec<&Track> {
        self.clips
            .values()
            .filter(|clip| clip.player == player)
            .map(|clip| &clip.track)
            .collect()
    }

    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn clip_mut(&mut self, player: PlayerHandle, clip: ClipHandle) -> Result<&mut SimClip> {
        self.clips
            .get_mut(&clip)
            .filter(|c| c.player == player)
            .ok_or_else(|| PlaybackError::backend(format!("unknown clip {:?}", clip)))
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(Duration::from_secs(180))
    }
}

impl AudioBackend for SimulatedBackend {
    fn load_track(&mut self, path: &Path, name: &Track) -> Result<()> {
        let file = path.join(name.file_name());
        if !file.is_file() {
            return Err(PlaybackError::backend(format!(
                "clip file not found: {}",
                file.display()
            )));
        }
        if self.log {
            tracing::debug!("Loaded clip '{}' from {}", name, file.display());
        }
        self.loaded.insert(name.clone(), self.clip_length);
        Ok(())
    }

    fn create_player(&mut self, entity: EntityId) -> Result<PlayerHandle> {
        if let Some((handle, _)) = self.players.iter().find(|(_, p)| p.entity == entity) {
            return Ok(*handle);
        }
        let handle = PlayerHandle(self.next_handle());
        self.players.insert(
            handle,
            SimPlayer {
                entity,
                attached_to: None,
            },
        );
        if self.log {
            tracing::debug!("Created audio player {:?} for {}", handle, entity);
        }
        Ok(handle)
    }

    fn attach_player(
        &mut self,
        player: PlayerHandle,
        target: &AttachPoint,
        speakers: &SpeakerSettings,
    ) -> Result<()> {
        let log = self.log;
        let sim = self
            .players
            .get_mut(&player)
            .ok_or_else(|| PlaybackError::backend(format!("unknown player {:?}", player)))?;
        if log {
            tracing::debug!(
                "Attached {} speaker(s) of {} to {:?} (volume {}, {}..{})",
                speakers.count,
                sim.entity,
                target,
                speakers.volume,
                speakers.min_distance,
                speakers.max_distance
            );
        }
        sim.attached_to = Some(target.clone());
        Ok(())
    }

    fn add_clip(&mut self, player: PlayerHandle, track: &Track, looping: bool) -> Result<ClipHandle> {
        if !self.players.contains_key(&player) {
            return Err(PlaybackError::backend(format!("unknown player {:?}", player)));
        }
        let sample_length = *self
            .loaded
            .get(track)
            .ok_or_else(|| PlaybackError::backend(format!("clip '{}' is not loaded", track)))?;

        let handle = ClipHandle(self.next_handle());
        self.clips.insert(
            handle,
            SimClip {
                player,
                track: track.clone(),
                read_position: 0,
                sample_length,
                paused: false,
                looping,
            },
        );
        Ok(handle)
    }

    fn remove_clip(&mut self, _player: PlayerHandle, clip: ClipHandle) {
        self.clips.remove(&clip);
    }

    fn clip_status(&self, player: PlayerHandle, clip: ClipHandle) -> Option<ClipStatus> {
        self.clips
            .get(&clip)
            .filter(|c| c.player == player)
            .map(|c| ClipStatus {
                read_position: c.read_position,
                sample_length: c.sample_length,
                paused: c.paused,
                looping: c.looping,
            })
    }

    fn set_paused(&mut self, player: PlayerHandle, clip: ClipHandle, paused: bool) -> Result<()> {
        self.clip_mut(player, clip)?.paused = paused;
        Ok(())
    }

    fn set_looping(&mut self, player: PlayerHandle, clip: ClipHandle, looping: bool) -> Result<()> {
        self.clip_mut(player, clip)?.looping = looping;
        Ok(())
    }
}
