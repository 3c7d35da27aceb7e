//! Boombox plugin - host event handlers
//!
//! [`BoomboxPlugin`] glues the playback core to the game host. The host
//! calls one handler per event; each handler looks up the boombox's session,
//! drives it, shows hints and keeps the easter egg timer in sync.
//!
//! Errors never leave a handler: they are logged and the event is skipped,
//! except for console commands which report them to the player.

use crate::{
    commands::{BoomboxCommand, CommandResponse, USAGE},
    config::PluginConfig,
    easter_egg::EasterEgg,
    error::{PluginError, Result},
    hints::{Hint, LONG_HINT},
    host::{HeldItem, Host, PlayerRef, TrackedItem, Verdict, VoiceChannel},
    keybinds::KeyAction,
};
use boombox_playback::{
    AttachPoint, AudioBackend, Category, Direction, EntityId, EntityRegistry, LoopMode,
    PlaybackError, PlayerId, ShuffleSelector, TickOutcome, TickReport, TrackChange,
};
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;

/// Event handlers for every tracked boombox of a server
///
/// Owns the configuration, the round-scoped session registry, the shuffle
/// catalog and the audio backend. Host events arrive one at a time through
/// `&mut self`; [`BoomboxService`](crate::BoomboxService) shares it with the
/// polling loop.
pub struct BoomboxPlugin<B: AudioBackend> {
    config: PluginConfig,
    registry: EntityRegistry,
    selector: ShuffleSelector,
    backend: B,
    host: Arc<dyn Host>,
    rng: StdRng,
    easter_egg: EasterEgg,
}

impl<B: AudioBackend> BoomboxPlugin<B> {
    /// Create a plugin from a validated configuration
    pub fn new(config: PluginConfig, backend: B, host: Arc<dyn Host>) -> Self {
        let easter_egg = EasterEgg::new(config.easter_egg.clone());
        Self {
            config,
            registry: EntityRegistry::new(),
            selector: ShuffleSelector::new(),
            backend,
            host,
            rng: StdRng::from_entropy(),
            easter_egg,
        }
    }

    /// Use a seeded random source (reproducible shuffles)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ===== Accessors =====

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn easter_egg(&self) -> &EasterEgg {
        &self.easter_egg
    }

    /// Whether `entity` is a tracked boombox
    pub fn is_boombox(&self, entity: EntityId) -> bool {
        self.registry.contains(entity)
    }

    // ===== Lifecycle =====

    /// Load every configured clip
    ///
    /// Clips that fail to load are removed from their playlist. Returns the
    /// number of clips loaded.
    pub fn on_enabled(&mut self) -> Result<usize> {
        if !self.config.is_enabled {
            return Err(PluginError::Disabled);
        }

        let audio_path = self.config.audio_path.clone();
        tracing::info!("Loading audio clips from directory: {}", audio_path.display());

        let backend = &mut self.backend;
        let mut loaded = 0;
        let mut failed = 0;
        for (category, playlist) in self.config.boombox.playlists.iter_mut() {
            let removed = playlist.retain(|track| match backend.load_track(&audio_path, track) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Failed to load clip '{}' ({} playlist): {}", track, category, e);
                    false
                }
            });
            failed += removed.len();
            loaded += playlist.len();
        }

        if failed > 0 {
            tracing::warn!("Removed {} clip(s) that failed to load from playlists", failed);
        }
        tracing::info!("Finished loading {} audio clip(s)", loaded);
        Ok(loaded)
    }

    /// Round start: rebuild the shuffle catalog and give every tracked
    /// boombox an audio player
    pub fn on_round_started(&mut self, tracked: &[TrackedItem], players: &[PlayerId]) {
        if let Some(hint) = self.config.hints.keybind_warning() {
            for player in players {
                self.show(player, Some(hint.clone()));
            }
        }

        self.selector.rebuild(&self.config.boombox.playlists);

        for item in tracked {
            let ready = self
                .registry
                .get(item.entity)
                .is_some_and(|session| session.has_player());
            if !ready {
                tracing::debug!("Round start: no audio player for {}, initializing", item.entity);
                if !self.initialize(item.entity, &item.location) {
                    tracing::error!("Round start: failed to initialize audio player for {}", item.entity);
                }
            }
        }

        self.easter_egg.reset();
        tracing::info!("Round started: tracking {} boombox(es)", self.registry.len());
    }

    /// Round end: stop all playback and forget every boombox
    pub fn on_round_ended(&mut self) {
        self.easter_egg.cancel();
        for session in self.registry.sessions_mut() {
            session.stop(&mut self.backend);
        }
        let dropped = self.registry.clear();
        tracing::info!("Round ended: released {} boombox(es)", dropped);
    }

    // ===== Item events =====

    /// A boombox pickup appeared (spawn, drop or holder death)
    pub fn on_pickup_spawned(&mut self, entity: EntityId) {
        tracing::debug!("Pickup spawned for {}", entity);
        self.follow(entity, AttachPoint::Pickup(entity));
    }

    /// A player now holds the boombox
    pub fn on_acquired(&mut self, player: &PlayerRef, entity: EntityId) {
        tracing::debug!("{} acquired {}", player.nickname, entity);
        self.follow(entity, AttachPoint::Holder(player.id.clone()));
        self.show(&player.id, self.config.hints.picked_up());
    }

    pub fn on_item_selected(&mut self, player: &PlayerRef, entity: EntityId) {
        if self.is_boombox(entity) {
            self.show(&player.id, self.config.hints.selected());
        }
    }

    /// Banned players may not pick a boombox up
    pub fn on_picking_up(&mut self, player: &PlayerRef, entity: EntityId) -> Verdict {
        if !self.is_boombox(entity) || !self.config.is_banned(player.id.as_str()) {
            return Verdict::Allow;
        }
        tracing::debug!("{} is banned from picking up {}", player.nickname, entity);
        let hint = Hint::new(self.config.banned_message.clone(), LONG_HINT);
        self.host.show_hint(&player.id, &hint.text, hint.duration);
        Verdict::Deny
    }

    /// Radio switched on or off: play or pause
    pub fn on_toggling_radio(&mut self, player: &PlayerRef, entity: EntityId, on: bool) {
        let Some(session) = self.registry.get_mut(entity) else {
            return;
        };
        tracing::debug!(
            "{} switched their {}: {}",
            player.nickname,
            entity,
            if on { "ON" } else { "OFF" }
        );
        if !session.has_player() {
            tracing::error!("No audio player for toggled {}", entity);
            return;
        }

        match session.toggle(on, &mut self.backend) {
            Ok(Some(change)) => {
                self.track_started(Some(player), &change);
                self.show(&player.id, self.config.hints.change_song(&change));
            }
            Ok(None) => self.sync_easter_egg(entity),
            Err(e) => {
                tracing::warn!("Toggle failed for {}: {}", entity, e);
                self.sync_easter_egg(entity);
            }
        }
    }

    /// Radio range changed: switch playlist
    ///
    /// Denied while the radio is off.
    pub fn on_changing_preset(
        &mut self,
        player: &PlayerRef,
        entity: EntityId,
        radio_on: bool,
        category: Category,
    ) -> Verdict {
        if !self.is_boombox(entity) {
            return Verdict::Allow;
        }
        if !radio_on {
            return Verdict::Deny;
        }
        if let Err(e) = self.change_playlist(entity, category, player) {
            tracing::debug!("Playlist change on {}: {}", entity, e);
        }
        Verdict::Allow
    }

    /// Server-specific key pressed while holding an item
    pub fn on_keybind_pressed(
        &mut self,
        player: &PlayerRef,
        held: Option<HeldItem>,
        setting_id: i32,
    ) {
        let Some(action) = self.config.keybinds.action_for(setting_id) else {
            return;
        };
        let Some(held) = held.filter(|held| self.is_boombox(held.entity)) else {
            return;
        };

        if !held.radio_on {
            if self.config.keybind_debug {
                tracing::debug!(
                    "{} can't interact: {} is off",
                    player.nickname,
                    held.entity
                );
            }
            return;
        }
        if self.config.keybind_debug {
            tracing::debug!(
                "{} pressed the {} key ({}, id={}) while holding {}",
                player.nickname,
                action,
                self.config.keybinds.label(action),
                setting_id,
                held.entity
            );
        }

        let result = match action {
            KeyAction::ChangeSong => self.change_song(held.entity, Direction::Next, player).map(drop),
            KeyAction::ShuffleSong => self.shuffle_song(held.entity, player).map(drop),
            KeyAction::CycleLoop => self.cycle_loop(held.entity, player).map(drop),
        };
        if let Err(e) = result {
            tracing::debug!("{} on {} failed: {}", action, held.entity, e);
        }
    }

    /// Boomboxes never drain their battery
    pub fn on_using_battery(&self, entity: EntityId) -> Verdict {
        if self.is_boombox(entity) {
            Verdict::Deny
        } else {
            Verdict::Allow
        }
    }

    /// Boomboxes cannot send or receive radio voice
    pub fn on_voice_message(&self, channel: VoiceChannel, held_radio: Option<EntityId>) -> Verdict {
        match (channel, held_radio) {
            (VoiceChannel::Radio, Some(entity)) if self.is_boombox(entity) => Verdict::Deny,
            _ => Verdict::Allow,
        }
    }

    /// `.boombox <change|next|shuffle|loop>`
    pub fn execute_command(
        &mut self,
        player: &PlayerRef,
        held: Option<HeldItem>,
        args: &[&str],
    ) -> CommandResponse {
        let Some(arg) = args.first() else {
            return CommandResponse::fail(USAGE);
        };
        let Some(held) = held.filter(|held| self.is_boombox(held.entity)) else {
            return CommandResponse::fail("Boombox is not equipped");
        };
        if !held.radio_on {
            return CommandResponse::fail("Boombox is not on");
        }

        let command = match arg.parse::<BoomboxCommand>() {
            Ok(command) => command,
            Err(invalid) => return CommandResponse::fail(invalid.to_string()),
        };
        tracing::debug!(
            "{} issued a boombox command for {}: {:?}",
            player.nickname,
            held.entity,
            command
        );

        let entity = held.entity;
        let result = match command {
            BoomboxCommand::Change => self
                .change_song(entity, Direction::Next, player)
                .map(|change| format!("Changed song to '{}'", change.track)),
            BoomboxCommand::Shuffle => self.shuffle_song(entity, player).map(|change| {
                format!(
                    "Shuffled song to '{}' from playlist '{}'",
                    change.track, change.playlist_name
                )
            }),
            BoomboxCommand::Loop => self
                .cycle_loop(entity, player)
                .map(|mode| format!("Toggled loop mode to '{}'", mode)),
        };

        match result {
            Ok(message) => CommandResponse::ok(message),
            Err(e) => CommandResponse::fail(e.to_string()),
        }
    }

    /// Periodic end-of-track check
    pub fn poll(&mut self) -> TickReport {
        let report = self
            .registry
            .tick_all(&mut self.selector, &mut self.rng, &mut self.backend);

        for (entity, outcome) in &report.outcomes {
            match outcome {
                TickOutcome::Advanced(change) | TickOutcome::Shuffled(change) => {
                    tracing::debug!("{} moved on to '{}'", entity, change.track);
                }
                TickOutcome::Finished(track) => {
                    tracing::debug!("{} finished '{}'", entity, track);
                }
                _ => {}
            }
        }
        self.easter_egg.observe(&report.events);
        report
    }

    // ===== Actions shared by keybinds and commands =====

    pub fn change_song(
        &mut self,
        entity: EntityId,
        direction: Direction,
        player: &PlayerRef,
    ) -> boombox_playback::Result<TrackChange> {
        let session = self
            .registry
            .get_mut(entity)
            .ok_or(PlaybackError::UnknownEntity(entity))?;
        let result = session.change_track(direction, &mut self.backend);
        self.finish_action(entity, player, result, |hints, change| hints.change_song(change))
    }

    pub fn shuffle_song(
        &mut self,
        entity: EntityId,
        player: &PlayerRef,
    ) -> boombox_playback::Result<TrackChange> {
        let session = self
            .registry
            .get_mut(entity)
            .ok_or(PlaybackError::UnknownEntity(entity))?;
        let result = session.shuffle(&mut self.selector, &mut self.rng, &mut self.backend);
        self.finish_action(entity, player, result, |hints, change| hints.shuffle_song(change))
    }

    pub fn cycle_loop(
        &mut self,
        entity: EntityId,
        player: &PlayerRef,
    ) -> boombox_playback::Result<LoopMode> {
        let session = self
            .registry
            .get_mut(entity)
            .ok_or(PlaybackError::UnknownEntity(entity))?;
        let mode = session.cycle_loop_mode(&mut self.backend);
        tracing::debug!("{} switched {} loop mode to {}", player.nickname, entity, mode);

        self.sync_easter_egg(entity);
        self.show(&player.id, self.config.hints.toggle_loop(mode));
        Ok(mode)
    }

    fn change_playlist(
        &mut self,
        entity: EntityId,
        category: Category,
        player: &PlayerRef,
    ) -> boombox_playback::Result<TrackChange> {
        let session = self
            .registry
            .get_mut(entity)
            .ok_or(PlaybackError::UnknownEntity(entity))?;
        session.switch_category(category);
        tracing::debug!(
            "{} changed the {} playlist to {}: {}",
            player.nickname,
            entity,
            category,
            session.current_playlist().name
        );
        // Only the playlist hint, the song hint would overwrite it
        let result = session.change_track(Direction::Current, &mut self.backend);
        self.finish_action(entity, player, result, |hints, change| {
            hints.change_playlist(change)
        })
    }

    // ===== Internals =====

    fn finish_action<F>(
        &mut self,
        entity: EntityId,
        player: &PlayerRef,
        result: boombox_playback::Result<TrackChange>,
        hint: F,
    ) -> boombox_playback::Result<TrackChange>
    where
        F: FnOnce(&crate::hints::HintSettings, &TrackChange) -> Option<Hint>,
    {
        match &result {
            Ok(change) => {
                self.track_started(Some(player), change);
                self.show(&player.id, hint(&self.config.hints, change));
            }
            Err(_) => self.sync_easter_egg(entity),
        }
        result
    }

    /// Settle the easter egg after a track started on `change.entity`
    fn track_started(&mut self, player: Option<&PlayerRef>, change: &TrackChange) {
        tracing::debug!("Added clip '{}' to audio player for {}", change.track, change.entity);
        self.sync_easter_egg(change.entity);

        if let Some(player) = player {
            if self.easter_egg.matches(&change.track, &player.id) {
                self.easter_egg.arm(change.entity, Arc::clone(&self.host));
            }
        }
    }

    /// Feed the session's pending events to the easter egg
    fn sync_easter_egg(&mut self, entity: EntityId) {
        if let Some(session) = self.registry.get_mut(entity) {
            let events = session.drain_events();
            self.easter_egg.observe(&events);
        }
    }

    /// Re-target an existing audio player, or initialize the boombox
    fn follow(&mut self, entity: EntityId, target: AttachPoint) {
        let player = self.registry.get(entity).and_then(|session| session.player());
        match player {
            Some(player) => {
                if let Err(e) = self
                    .backend
                    .attach_player(player, &target, &self.config.boombox.speakers)
                {
                    tracing::error!("Failed to attach audio player of {} to {:?}: {}", entity, target, e);
                }
            }
            None => {
                tracing::debug!("No audio player for {}, initializing", entity);
                if !self.initialize(entity, &target) {
                    tracing::error!("Audio player is still missing for {}", entity);
                }
            }
        }
    }

    /// Fresh session plus a new audio player attached to `target`
    fn initialize(&mut self, entity: EntityId, target: &AttachPoint) -> bool {
        self.host.prepare_radio(entity);

        if let Some(mut stale) = self.registry.remove(entity) {
            stale.stop(&mut self.backend);
        }
        let session = self
            .registry
            .get_or_create(entity, &self.config.boombox.playlists);

        let player = match self.backend.create_player(entity) {
            Ok(player) => player,
            Err(e) => {
                tracing::error!("Failed to create audio player for {}: {}", entity, e);
                return false;
            }
        };
        tracing::info!("Created audio player for {}", entity);
        session.attach_player(player);

        if let Err(e) = self
            .backend
            .attach_player(player, target, &self.config.boombox.speakers)
        {
            tracing::error!("Speaker of {} was not attached to {:?}: {}", entity, target, e);
        }
        true
    }

    fn show(&self, player: &PlayerId, hint: Option<Hint>) {
        if let Some(hint) = hint {
            self.host.show_hint(player, &hint.text, hint.duration);
        }
    }
}
