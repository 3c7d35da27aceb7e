//! Common test utilities and fixtures

#![allow(dead_code)]

use boombox_playback::{Category, EntityId, PlayerId, Playlist, PlaylistSet, Track};
use boombox_plugin::{
    backends::SimulatedBackend,
    config::PluginConfig,
    host::{Host, PlayerRef},
    BoomboxPlugin,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;
use tempfile::TempDir;

pub const E1: EntityId = EntityId::new(1);
pub const E2: EntityId = EntityId::new(2);
pub const CLIP_LENGTH: Duration = Duration::from_secs(10);

/// Host that records every callback
#[derive(Default)]
pub struct RecordingHost {
    hints: Mutex<Vec<(PlayerId, String)>>,
    prepared: Mutex<Vec<EntityId>>,
    shakes: AtomicUsize,
}

impl RecordingHost {
    pub fn hints(&self) -> Vec<String> {
        self.hints
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn hints_for(&self, player: &PlayerId) -> Vec<String> {
        self.hints
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == player)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn last_hint(&self) -> Option<String> {
        self.hints().pop()
    }

    pub fn clear_hints(&self) {
        self.hints.lock().unwrap().clear();
    }

    pub fn prepared(&self) -> Vec<EntityId> {
        self.prepared.lock().unwrap().clone()
    }

    pub fn shakes(&self) -> usize {
        self.shakes.load(Ordering::SeqCst)
    }
}

impl Host for RecordingHost {
    fn show_hint(&self, player: &PlayerId, text: &str, _duration: Duration) {
        self.hints
            .lock()
            .unwrap()
            .push((player.clone(), text.to_string()));
    }

    fn prepare_radio(&self, entity: EntityId) {
        self.prepared.lock().unwrap().push(entity);
    }

    fn shake_facility(&self) {
        self.shakes.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Fixture {
    pub dir: TempDir,
    pub host: Arc<RecordingHost>,
    pub plugin: BoomboxPlugin<SimulatedBackend>,
}

pub fn dj() -> PlayerRef {
    PlayerRef::new("76561198000000000@steam", "DJ")
}

pub fn guest() -> PlayerRef {
    PlayerRef::new("76561198000000001@steam", "Guest")
}

fn playlist(name: &str, tracks: &[&str]) -> Playlist {
    Playlist::new(name, tracks.iter().map(|t| Track::new(*t)).collect())
}

/// Audio directory holding a.ogg, b.ogg and c.ogg
pub fn audio_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a", "b", "c"] {
        std::fs::write(dir.path().join(format!("{}.ogg", name)), b"OggS").unwrap();
    }
    dir
}

/// Short="Short Range" [a, b], Long="Long Range" [c]
pub fn config_in(dir: &TempDir) -> PluginConfig {
    let mut config = PluginConfig {
        audio_path: dir.path().to_path_buf(),
        ..PluginConfig::default()
    };
    config.boombox.playlists = PlaylistSet::new()
        .with_playlist(Category::Short, playlist("Short Range", &["a", "b"]))
        .with_playlist(Category::Long, playlist("Long Range", &["c"]));
    config
}

pub fn fixture_with(configure: impl FnOnce(&mut PluginConfig)) -> Fixture {
    let dir = audio_dir();
    let mut config = config_in(&dir);
    configure(&mut config);

    let host = Arc::new(RecordingHost::default());
    let mut plugin = BoomboxPlugin::new(
        config,
        SimulatedBackend::new(CLIP_LENGTH),
        host.clone(),
    )
    .with_seed(7);
    plugin.on_enabled().unwrap();

    Fixture { dir, host, plugin }
}

pub fn fixture() -> Fixture {
    fixture_with(|_| {})
}
