/// Plugin configuration
use crate::{
    error::{PluginError, Result},
    hints::HintSettings,
    keybinds::KeybindSettings,
};
use boombox_playback::{PlaylistSet, SpeakerSettings, Track};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory searched for clips when `audio_path` is empty or missing
pub const DEFAULT_AUDIO_PATH: &str = "audio/boombox";

/// Files tried, in order, when no config path is given
pub const DEFAULT_CONFIG_FILES: &[&str] = &["boombox.yaml", "boombox.yml", "boombox.toml"];

/// Prefix of environment overrides, e.g. `BOOMBOX__HINTS__SHOW_HINTS=false`
pub const ENV_PREFIX: &str = "BOOMBOX";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PluginConfig {
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,

    #[serde(default)]
    pub debug: bool,

    /// Log every boombox key press
    #[serde(default)]
    pub keybind_debug: bool,

    /// Verbose audio backend logs
    #[serde(default)]
    pub audio_debug: bool,

    /// Directory holding the `.ogg` clips
    #[serde(default)]
    pub audio_path: PathBuf,

    /// Seconds between end-of-track checks
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: f64,

    #[serde(default)]
    pub boombox: BoomboxSettings,

    #[serde(default)]
    pub hints: HintSettings,

    #[serde(default)]
    pub keybinds: KeybindSettings,

    /// Player ids that may not pick up a boombox
    #[serde(default)]
    pub banned_player_ids: Vec<String>,

    #[serde(default = "default_banned_message")]
    pub banned_message: String,

    #[serde(default)]
    pub easter_egg: EasterEggSettings,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BoomboxSettings {
    #[serde(default)]
    pub speakers: SpeakerSettings,

    #[serde(default)]
    pub spawn: SpawnSettings,

    /// One playlist per radio range
    #[serde(default)]
    pub playlists: PlaylistSet,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpawnSettings {
    /// Maximum boomboxes spawned per round
    #[serde(default = "default_spawn_limit")]
    pub limit: u32,

    #[serde(default = "default_spawn_points")]
    pub points: Vec<SpawnPoint>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpawnPoint {
    /// Percent chance, `0..=100`
    pub chance: f32,

    /// Host location name
    pub location: String,
}

/// Once-per-round facility shake when a given player starts a given song
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EasterEggSettings {
    #[serde(default)]
    pub enabled: bool,

    /// Clip name, extension optional
    #[serde(default)]
    pub song: String,

    /// Only this player can trigger it
    #[serde(default)]
    pub player_id: String,

    /// Seconds between the song start and the shake
    #[serde(default)]
    pub delay_secs: f64,
}

impl PluginConfig {
    /// Load configuration from file and environment
    ///
    /// With no explicit path the first existing file of
    /// [`DEFAULT_CONFIG_FILES`] is used, if any.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(PluginError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                if let Some(found) = DEFAULT_CONFIG_FILES
                    .iter()
                    .map(Path::new)
                    .find(|candidate| candidate.exists())
                {
                    settings = settings.add_source(config::File::from(found));
                }
            }
        }

        // Override with environment variables (BOOMBOX__SECTION__KEY)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        config
            .try_deserialize()
            .map_err(|e| PluginError::Config(e.to_string()))
    }

    /// Normalise out-of-range values, warning about each fix
    pub fn validate(&mut self) -> Result<()> {
        self.validate_with_audio_fallback(Path::new(DEFAULT_AUDIO_PATH))
    }

    /// [`validate`](Self::validate) with an explicit fallback audio directory
    pub fn validate_with_audio_fallback(&mut self, fallback: &Path) -> Result<()> {
        // Audio path
        if self.audio_path.as_os_str().is_empty() {
            self.audio_path = fallback.to_path_buf();
        } else if !self.audio_path.is_dir() {
            tracing::warn!(
                "Audio path does not exist: '{}' - using default path: '{}'",
                self.audio_path.display(),
                fallback.display()
            );
            self.audio_path = fallback.to_path_buf();
        }
        if !self.audio_path.is_dir() {
            return Err(PluginError::Config(format!(
                "No valid audio path provided and the default audio path does not exist: {}",
                self.audio_path.display()
            )));
        }

        if self.boombox.playlists.total_tracks() == 0 {
            tracing::warn!("Config has no songs in any playlist, the boombox will not play anything");
        }

        // Speakers
        let speakers = &mut self.boombox.speakers;
        if !(0.0..=1.0).contains(&speakers.volume) {
            tracing::warn!(
                "Config had invalid speaker volume: {} - defaulting to 1.0",
                speakers.volume
            );
            speakers.volume = 1.0;
        }
        if speakers.count > 10 {
            tracing::warn!(
                "Config had invalid speaker count: {} - defaulting to 1",
                speakers.count
            );
            speakers.count = 1;
        }
        if speakers.min_distance < 1.0 {
            tracing::warn!(
                "Config had invalid min distance: {} - defaulting to 1.0",
                speakers.min_distance
            );
            speakers.min_distance = 1.0;
        }
        if speakers.max_distance <= speakers.min_distance {
            let fixed = speakers.min_distance + 20.0;
            tracing::warn!(
                "Config had invalid max distance: {} - defaulting to {}",
                speakers.max_distance,
                fixed
            );
            speakers.max_distance = fixed;
        }

        // Spawn chances
        for point in &mut self.boombox.spawn.points {
            if !(0.0..=100.0).contains(&point.chance) {
                let clamped = point.chance.clamp(0.0, 100.0);
                tracing::warn!(
                    "Config had invalid spawn chance {} at {} - clamping to {}",
                    point.chance,
                    point.location,
                    clamped
                );
                point.chance = clamped;
            }
        }

        if self.keybinds.has_duplicate_ids() {
            tracing::warn!("Config has boombox keybinds sharing a setting id");
        }

        if !is_positive_duration(self.poll_interval_secs) {
            tracing::warn!(
                "Config had invalid poll interval: {} - defaulting to 1 second",
                self.poll_interval_secs
            );
            self.poll_interval_secs = default_poll_interval();
        }

        self.validate_easter_egg();

        Ok(())
    }

    fn validate_easter_egg(&mut self) {
        let egg = &mut self.easter_egg;
        if !egg.enabled {
            return;
        }

        egg.song = Track::new(egg.song.trim()).as_str().to_string();
        if egg.song.is_empty() {
            tracing::warn!("Easter egg enabled but the song is empty");
            egg.enabled = false;
        } else if !self.audio_path.join(egg.track().file_name()).is_file() {
            tracing::warn!("Easter egg enabled but the song does not exist: {}", egg.song);
            egg.enabled = false;
        }
        if !egg.player_id.contains("@steam") {
            tracing::warn!(
                "Easter egg enabled but the player id is invalid: '{}'",
                egg.player_id
            );
            egg.enabled = false;
        }
        if Duration::try_from_secs_f64(egg.delay_secs).is_err() {
            tracing::warn!("Easter egg enabled but the delay is invalid: {}", egg.delay_secs);
            egg.enabled = false;
        }

        if egg.enabled {
            tracing::debug!("Easter egg is enabled :)");
        }
    }

    /// Clip files named by the playlists that are not on disk
    pub fn missing_track_files(&self) -> Vec<PathBuf> {
        self.boombox
            .playlists
            .iter()
            .flat_map(|(_, playlist)| playlist.tracks())
            .map(|track| self.audio_path.join(track.file_name()))
            .filter(|path| !path.is_file())
            .collect()
    }

    /// Period of the end-of-track check, never zero
    pub fn poll_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.poll_interval_secs)
            .ok()
            .filter(|period| !period.is_zero())
            .unwrap_or(Duration::from_secs(1))
    }

    pub fn is_banned(&self, player_id: &str) -> bool {
        self.banned_player_ids.iter().any(|id| id == player_id)
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            is_enabled: default_enabled(),
            debug: false,
            keybind_debug: false,
            audio_debug: false,
            audio_path: PathBuf::new(),
            poll_interval_secs: default_poll_interval(),
            boombox: BoomboxSettings::default(),
            hints: HintSettings::default(),
            keybinds: KeybindSettings::default(),
            banned_player_ids: Vec::new(),
            banned_message: default_banned_message(),
            easter_egg: EasterEggSettings::default(),
        }
    }
}

impl SpawnSettings {
    /// Roll every spawn point in order, stopping at the limit
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<&SpawnPoint> {
        let mut spawned = Vec::new();
        for point in &self.points {
            if spawned.len() >= self.limit as usize {
                break;
            }
            if rng.gen_range(0.0..100.0) < point.chance {
                spawned.push(point);
            }
        }
        spawned
    }
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            limit: default_spawn_limit(),
            points: default_spawn_points(),
        }
    }
}

impl EasterEggSettings {
    pub fn track(&self) -> Track {
        Track::new(self.song.as_str())
    }

    /// Delay before the shake, `None` when `delay_secs` is negative, NaN or too large
    pub fn delay(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.delay_secs).ok()
    }
}

/// Whether `secs` converts to a non-zero `Duration`
fn is_positive_duration(secs: f64) -> bool {
    Duration::try_from_secs_f64(secs).is_ok_and(|period| !period.is_zero())
}

// Default values
fn default_enabled() -> bool {
    true
}

fn default_poll_interval() -> f64 {
    1.0
}

fn default_banned_message() -> String {
    "You are currently banned from using the Boombox :)".to_string()
}

fn default_spawn_limit() -> u32 {
    1
}

fn default_spawn_points() -> Vec<SpawnPoint> {
    vec![SpawnPoint {
        chance: 100.0,
        location: "Inside914".to_string(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use boombox_playback::{Category, Playlist};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config_in(dir: &Path) -> PluginConfig {
        PluginConfig {
            audio_path: dir.to_path_buf(),
            ..PluginConfig::default()
        }
    }

    #[test]
    fn out_of_range_speakers_are_normalised() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.boombox.speakers = SpeakerSettings {
            volume: 1.5,
            count: 11,
            min_distance: 0.5,
            max_distance: 0.5,
        };

        config.validate().unwrap();

        let speakers = &config.boombox.speakers;
        assert_eq!(speakers.volume, 1.0);
        assert_eq!(speakers.count, 1);
        assert_eq!(speakers.min_distance, 1.0);
        assert_eq!(speakers.max_distance, 21.0);
    }

    #[test]
    fn valid_speakers_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.boombox.speakers.count = 10;
        config.boombox.speakers.volume = 0.0;

        config.validate().unwrap();

        assert_eq!(config.boombox.speakers.count, 10);
        assert_eq!(config.boombox.speakers.volume, 0.0);
    }

    #[test]
    fn missing_audio_path_falls_back() {
        let fallback = tempfile::tempdir().unwrap();
        let mut config = PluginConfig {
            audio_path: PathBuf::from("/definitely/not/here"),
            ..PluginConfig::default()
        };

        config.validate_with_audio_fallback(fallback.path()).unwrap();

        assert_eq!(config.audio_path, fallback.path());
    }

    #[test]
    fn no_audio_directory_is_an_error() {
        let mut config = PluginConfig::default();
        let result = config.validate_with_audio_fallback(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(PluginError::Config(_))));
    }

    #[test]
    fn spawn_chances_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.boombox.spawn.points = vec![
            SpawnPoint {
                chance: 150.0,
                location: "Inside914".to_string(),
            },
            SpawnPoint {
                chance: -3.0,
                location: "InsideLczWc".to_string(),
            },
        ];

        config.validate().unwrap();

        assert_eq!(config.boombox.spawn.points[0].chance, 100.0);
        assert_eq!(config.boombox.spawn.points[1].chance, 0.0);
    }

    #[test]
    fn easter_egg_needs_existing_song_and_steam_id() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("drop.ogg"), b"OggS").unwrap();

        let mut config = config_in(dir.path());
        config.easter_egg = EasterEggSettings {
            enabled: true,
            song: "drop.ogg".to_string(),
            player_id: "76561198000000000@steam".to_string(),
            delay_secs: 12.5,
        };
        config.validate().unwrap();
        assert!(config.easter_egg.enabled);
        assert_eq!(config.easter_egg.song, "drop");

        let mut config = config_in(dir.path());
        config.easter_egg = EasterEggSettings {
            enabled: true,
            song: "missing".to_string(),
            player_id: "76561198000000000@steam".to_string(),
            delay_secs: 1.0,
        };
        config.validate().unwrap();
        assert!(!config.easter_egg.enabled);

        let mut config = config_in(dir.path());
        config.easter_egg = EasterEggSettings {
            enabled: true,
            song: "drop".to_string(),
            player_id: "someone@discord".to_string(),
            delay_secs: 1.0,
        };
        config.validate().unwrap();
        assert!(!config.easter_egg.enabled);

        let mut config = config_in(dir.path());
        config.easter_egg = EasterEggSettings {
            enabled: true,
            song: "drop".to_string(),
            player_id: "76561198000000000@steam".to_string(),
            delay_secs: -1.0,
        };
        config.validate().unwrap();
        assert!(!config.easter_egg.enabled);
    }

    #[test]
    fn bad_poll_interval_resets_to_one_second() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.poll_interval_secs = 0.0;

        config.validate().unwrap();

        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn sub_nanosecond_poll_interval_resets_to_one_second() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.poll_interval_secs = 1e-10;
        assert_eq!(config.poll_interval(), Duration::from_secs(1));

        config.validate().unwrap();

        assert_eq!(config.poll_interval_secs, 1.0);
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn unrepresentable_easter_egg_delay_disables_it() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("drop.ogg"), b"OggS").unwrap();

        for delay_secs in [f64::INFINITY, f64::NAN, 1e30] {
            let mut config = config_in(dir.path());
            config.easter_egg = EasterEggSettings {
                enabled: true,
                song: "drop".to_string(),
                player_id: "76561198000000000@steam".to_string(),
                delay_secs,
            };
            assert_eq!(config.easter_egg.delay(), None);

            config.validate().unwrap();

            assert!(!config.easter_egg.enabled, "delay {} kept the egg", delay_secs);
        }
    }

    #[test]
    fn missing_track_files_lists_absent_clips() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("here.ogg"), b"OggS").unwrap();
        let mut config = config_in(dir.path());
        config.boombox.playlists = PlaylistSet::new().with_playlist(
            Category::Medium,
            Playlist::new("Mix", vec![Track::new("here.ogg"), Track::new("gone")]),
        );

        assert_eq!(
            config.missing_track_files(),
            vec![dir.path().join("gone.ogg")]
        );
    }

    #[test]
    fn spawn_roll_respects_limit() {
        let spawn = SpawnSettings {
            limit: 1,
            points: vec![
                SpawnPoint {
                    chance: 100.0,
                    location: "A".to_string(),
                },
                SpawnPoint {
                    chance: 100.0,
                    location: "B".to_string(),
                },
            ],
        };
        let mut rng = StdRng::seed_from_u64(1);

        let spawned = spawn.roll(&mut rng);

        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].location, "A");
    }

    #[test]
    fn zero_chance_never_spawns() {
        let spawn = SpawnSettings {
            limit: 5,
            points: vec![SpawnPoint {
                chance: 0.0,
                location: "A".to_string(),
            }],
        };
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            assert!(spawn.roll(&mut rng).is_empty());
        }
    }

    #[test]
    fn banned_ids_match_exactly() {
        let config = PluginConfig {
            banned_player_ids: vec!["1@steam".to_string()],
            ..PluginConfig::default()
        };
        assert!(config.is_banned("1@steam"));
        assert!(!config.is_banned("11@steam"));
    }
}
