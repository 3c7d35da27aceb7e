//! Playback session - per-entity state machine
//!
//! Owns one boombox's playlists, active category, loop mode and the clip
//! currently in flight on its audio player.
//!
//! ```text
//!            toggle(on)                toggle(off)
//!   Idle ──────────────────> Playing ──────────────> Paused
//!    ^   change_track/shuffle  │  ^                    │
//!    │                         │  └────────────────────┘
//!    └─── tick: track ended ───┘        toggle(on)
//!         with LoopMode::Off
//! ```

use crate::{
    backend::{AudioBackend, ClipHandle, PlayerHandle},
    error::{PlaybackError, Result},
    events::SessionEvent,
    playlist::{Playlist, PlaylistSet},
    shuffle::ShuffleSelector,
    types::{Category, Direction, EntityId, LoopMode, SessionState, Track},
};
use rand::Rng;

/// Result of a track change, used for hints and command responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackChange {
    /// Entity whose track changed
    pub entity: EntityId,

    /// Category the track was taken from
    pub category: Category,

    /// Name of that category's playlist
    pub playlist_name: String,

    /// The track now playing
    pub track: Track,

    /// Whether the track came from a shuffle pick
    pub shuffled: bool,
}

/// What a tick did to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing is playing (idle or paused)
    Inactive,

    /// The clip is still playing
    Playing,

    /// The clip ended and the session went idle
    Finished(Track),

    /// The clip ended while repeating; the audio collaborator restarts it
    Repeating,

    /// The clip ended and the next playlist track started
    Advanced(TrackChange),

    /// The clip ended and a shuffled track started
    Shuffled(TrackChange),
}

#[derive(Debug, Clone)]
struct NowPlaying {
    track: Track,
    clip: ClipHandle,
    shuffled: bool,
}

/// Navigation position saved before a shuffle override
#[derive(Debug, Clone, Copy)]
struct ResumePoint {
    category: Category,
    cursors: [usize; 4],
}

/// Per-entity playback state
///
/// A shuffle is a transient override: the position before the first shuffle
/// is kept and restored by the next [`change_track`] or [`switch_category`],
/// so playlist navigation continues where it left off.
///
/// [`change_track`]: PlaybackSession::change_track
/// [`switch_category`]: PlaybackSession::switch_category
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    entity: EntityId,
    playlists: PlaylistSet,
    category: Category,
    loop_mode: LoopMode,
    state: SessionState,
    player: Option<PlayerHandle>,
    now_playing: Option<NowPlaying>,
    resume_point: Option<ResumePoint>,
    pending_events: Vec<SessionEvent>,
}

impl PlaybackSession {
    /// Create an idle session on the Short category with looping off
    pub fn new(entity: EntityId, playlists: PlaylistSet) -> Self {
        Self {
            entity,
            playlists,
            category: Category::Short,
            loop_mode: LoopMode::Off,
            state: SessionState::Idle,
            player: None,
            now_playing: None,
            resume_point: None,
            pending_events: Vec::new(),
        }
    }

    // ===== Accessors =====

    /// Entity this session belongs to
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Active category
    pub fn active_category(&self) -> Category {
        self.category
    }

    /// Active loop mode
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    /// The session's own playlists
    pub fn playlists(&self) -> &PlaylistSet {
        &self.playlists
    }

    /// Playlist of the active category
    pub fn current_playlist(&self) -> &Playlist {
        self.playlists.get(self.category)
    }

    /// Track of the clip in flight
    pub fn now_playing(&self) -> Option<&Track> {
        self.now_playing.as_ref().map(|now| &now.track)
    }

    /// Whether the clip in flight came from a shuffle pick
    pub fn is_shuffled(&self) -> bool {
        self.now_playing.as_ref().is_some_and(|now| now.shuffled)
    }

    /// Attached audio player
    pub fn player(&self) -> Option<PlayerHandle> {
        self.player
    }

    /// Whether an audio player is attached
    pub fn has_player(&self) -> bool {
        self.player.is_some()
    }

    /// Bind the audio player created for this entity
    pub fn attach_player(&mut self, player: PlayerHandle) {
        self.player = Some(player);
    }

    // ===== Transitions =====

    /// Play the current, next or previous track of the active playlist
    ///
    /// Fails without touching the cursor, the state or the backend when the
    /// active playlist is empty or no audio player is attached.
    pub fn change_track(
        &mut self,
        direction: Direction,
        backend: &mut dyn AudioBackend,
    ) -> Result<TrackChange> {
        let origin = self
            .resume_point
            .map_or(self.category, |resume| resume.category);
        if self.playlists.get(origin).is_empty() {
            tracing::debug!("{}: no tracks in the {} playlist", self.entity, origin);
            return Err(PlaybackError::EmptyPlaylist(origin));
        }
        let player = self.player.ok_or(PlaybackError::NoAudioBackend(self.entity))?;

        self.restore_resume_point();

        let playlist = self.playlists.get_mut(self.category);
        let track = match direction {
            Direction::Current => playlist.current(),
            Direction::Next => playlist.next(),
            Direction::Previous => playlist.previous(),
        }
        .cloned()
        .ok_or(PlaybackError::EmptyPlaylist(self.category))?;

        self.start_track(backend, player, track, false)
    }

    /// Handle the radio being switched on or off
    ///
    /// Switching on from idle starts the current track; from paused it
    /// resumes. Switching off pauses. Other combinations do nothing.
    pub fn toggle(
        &mut self,
        enabled: bool,
        backend: &mut dyn AudioBackend,
    ) -> Result<Option<TrackChange>> {
        match (enabled, self.state) {
            (true, SessionState::Idle) => self.change_track(Direction::Current, backend).map(Some),
            (true, SessionState::Paused) => {
                let (player, clip) = self.active_clip()?;
                backend.set_paused(player, clip, false)?;
                self.state = SessionState::Playing;
                self.pending_events.push(SessionEvent::Resumed {
                    entity: self.entity,
                });
                Ok(None)
            }
            (false, SessionState::Playing) => {
                let (player, clip) = self.active_clip()?;
                backend.set_paused(player, clip, true)?;
                self.state = SessionState::Paused;
                self.pending_events.push(SessionEvent::Paused {
                    entity: self.entity,
                });
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    /// Make `category` the active playlist
    ///
    /// Does not change the track; callers follow up with
    /// `change_track(Direction::Current)`.
    pub fn switch_category(&mut self, category: Category) {
        if let Some(resume) = self.resume_point.take() {
            self.playlists.restore_cursors(resume.cursors);
        }
        self.category = category;
        self.pending_events.push(SessionEvent::CategoryChanged {
            entity: self.entity,
            category,
        });
    }

    /// Advance to the next loop mode
    ///
    /// The repeat flag of the clip in flight follows the new mode.
    pub fn cycle_loop_mode(&mut self, backend: &mut dyn AudioBackend) -> LoopMode {
        self.loop_mode = self.loop_mode.next();

        if let (Some(player), Some(now)) = (self.player, self.now_playing.as_ref()) {
            let looping = self.loop_mode.repeats_track();
            if let Err(e) = backend.set_looping(player, now.clip, looping) {
                tracing::warn!("{}: failed to set loop flag on '{}': {}", self.entity, now.track, e);
            }
        }

        self.pending_events.push(SessionEvent::LoopModeChanged {
            entity: self.entity,
            mode: self.loop_mode,
        });
        self.loop_mode
    }

    /// Play a random track from any category
    pub fn shuffle<R: Rng + ?Sized>(
        &mut self,
        selector: &mut ShuffleSelector,
        rng: &mut R,
        backend: &mut dyn AudioBackend,
    ) -> Result<TrackChange> {
        let player = self.player.ok_or(PlaybackError::NoAudioBackend(self.entity))?;
        let pick = selector.pick(&self.playlists, rng)?;

        let resume = self.resume_point.unwrap_or(ResumePoint {
            category: self.category,
            cursors: self.playlists.cursors(),
        });
        let track = self
            .playlists
            .get_mut(pick.category)
            .set_index(pick.index)?
            .clone();

        tracing::debug!(
            "{}: shuffled to '{}' from the {} playlist",
            self.entity,
            track,
            pick.category
        );
        self.resume_point = Some(resume);
        self.category = pick.category;
        self.start_track(backend, player, track, true)
    }

    /// End-of-track check, called periodically
    ///
    /// When the clip in flight has ended the loop mode decides what follows.
    /// If the follow-up fails the finished clip is released and the session
    /// goes idle before the error is returned.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        selector: &mut ShuffleSelector,
        rng: &mut R,
        backend: &mut dyn AudioBackend,
    ) -> Result<TickOutcome> {
        if self.state != SessionState::Playing {
            return Ok(TickOutcome::Inactive);
        }
        let player = self.player.ok_or(PlaybackError::NoAudioBackend(self.entity))?;
        let Some(now) = self.now_playing.as_ref() else {
            self.state = SessionState::Idle;
            return Ok(TickOutcome::Inactive);
        };

        // A clip the backend no longer knows has ended as far as we can tell
        let finished = backend
            .clip_status(player, now.clip)
            .map_or(true, |status| status.is_finished() && !status.paused);
        if !finished {
            return Ok(TickOutcome::Playing);
        }

        let ended = now.track.clone();
        tracing::debug!(
            "{}: clip '{}' ended, loop mode {}",
            self.entity,
            ended,
            self.loop_mode
        );

        let outcome = match self.loop_mode {
            LoopMode::Off => {
                self.finish_track(backend, player);
                Ok(TickOutcome::Finished(ended))
            }
            LoopMode::RepeatOne => Ok(TickOutcome::Repeating),
            LoopMode::CyclePlaylist => self
                .change_track(Direction::Next, backend)
                .map(TickOutcome::Advanced),
            LoopMode::ShuffleAll => self
                .shuffle(selector, rng, backend)
                .map(TickOutcome::Shuffled),
        };

        if outcome.is_err() && self.now_playing.is_some() {
            self.finish_track(backend, player);
        }
        outcome
    }

    /// Release the clip in flight and go idle
    pub fn stop(&mut self, backend: &mut dyn AudioBackend) {
        if let Some(player) = self.player {
            self.release_clip(backend, player);
        }
        self.now_playing = None;
        self.state = SessionState::Idle;
    }

    // ===== Events =====

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    fn active_clip(&self) -> Result<(PlayerHandle, ClipHandle)> {
        let player = self.player.ok_or(PlaybackError::NoAudioBackend(self.entity))?;
        let clip = self
            .now_playing
            .as_ref()
            .map(|now| now.clip)
            .ok_or_else(|| PlaybackError::backend(format!("{} has no clip in flight", self.entity)))?;
        Ok((player, clip))
    }

    fn restore_resume_point(&mut self) {
        if let Some(resume) = self.resume_point.take() {
            self.category = resume.category;
            self.playlists.restore_cursors(resume.cursors);
        }
    }

    fn start_track(
        &mut self,
        backend: &mut dyn AudioBackend,
        player: PlayerHandle,
        track: Track,
        shuffled: bool,
    ) -> Result<TrackChange> {
        self.release_clip(backend, player);

        let clip = match backend.add_clip(player, &track, self.loop_mode.repeats_track()) {
            Ok(clip) => clip,
            Err(e) => {
                self.state = SessionState::Idle;
                return Err(e);
            }
        };

        tracing::debug!("{}: added clip '{}'", self.entity, track);
        self.now_playing = Some(NowPlaying {
            track: track.clone(),
            clip,
            shuffled,
        });
        self.state = SessionState::Playing;
        self.pending_events.push(SessionEvent::TrackStarted {
            entity: self.entity,
            category: self.category,
            track: track.clone(),
            shuffled,
        });

        Ok(TrackChange {
            entity: self.entity,
            category: self.category,
            playlist_name: self.current_playlist().name.clone(),
            track,
            shuffled,
        })
    }

    fn release_clip(&mut self, backend: &mut dyn AudioBackend, player: PlayerHandle) {
        if let Some(now) = self.now_playing.take() {
            backend.remove_clip(player, now.clip);
            self.pending_events.push(SessionEvent::TrackStopped {
                entity: self.entity,
                track: now.track,
            });
        }
    }

    fn finish_track(&mut self, backend: &mut dyn AudioBackend, player: PlayerHandle) {
        self.state = SessionState::Idle;
        if let Some(now) = self.now_playing.take() {
            backend.remove_clip(player, now.clip);
            self.pending_events.push(SessionEvent::TrackFinished {
                entity: self.entity,
                track: now.track,
            });
        }
    }
}
