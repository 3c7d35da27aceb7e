//! Configuration file loading tests

use boombox_playback::{Category, Track};
use boombox_plugin::{config::PluginConfig, PluginError};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

const YAML: &str = r#"
is_enabled: true
debug: true
poll_interval_secs: 0.5
boombox:
  speakers:
    volume: 0.8
    count: 3
  spawn:
    limit: 2
    points:
      - chance: 50
        location: Lcz914
      - chance: 100
        location: HczArmory
  playlists:
    short:
      name: Chill
      songs:
        - intro.ogg
        - outro
    long:
      tracks: [anthem]
hints:
  show_hints: false
keybinds:
  change_song_id: 1
banned_player_ids:
  - 76561198000000001@steam
"#;

#[test]
fn loads_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "boombox.yaml", YAML);

    let config = PluginConfig::load(Some(&path)).unwrap();

    assert!(config.debug);
    assert_eq!(config.poll_interval_secs, 0.5);
    assert_eq!(config.boombox.speakers.volume, 0.8);
    assert_eq!(config.boombox.speakers.count, 3);
    assert_eq!(config.boombox.spawn.limit, 2);
    assert_eq!(config.boombox.spawn.points.len(), 2);
    assert_eq!(config.boombox.spawn.points[1].location, "HczArmory");
    assert!(!config.hints.show_hints);
    assert_eq!(config.keybinds.change_song_id, 1);
    assert!(config.is_banned("76561198000000001@steam"));

    let short = config.boombox.playlists.get(Category::Short);
    assert_eq!(short.name, "Chill");
    assert_eq!(short.tracks(), &[Track::new("intro"), Track::new("outro")]);

    // Unnamed playlists take the category name, absent ones are empty
    let long = config.boombox.playlists.get(Category::Long);
    assert_eq!(long.name, "Long");
    assert_eq!(long.tracks(), &[Track::new("anthem")]);
    assert!(config.boombox.playlists.get(Category::Ultra).is_empty());
}

#[test]
fn loads_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "boombox.toml",
        r#"
keybind_debug = true

[boombox.playlists.medium]
name = "Mid"
tracks = ["a", "b.ogg"]

[easter_egg]
enabled = true
song = "secret.ogg"
player_id = "76561198000000000@steam"
delay_secs = 12.5
"#,
    );

    let config = PluginConfig::load(Some(&path)).unwrap();

    assert!(config.keybind_debug);
    let medium = config.boombox.playlists.get(Category::Medium);
    assert_eq!(medium.name, "Mid");
    assert_eq!(medium.tracks(), &[Track::new("a"), Track::new("b")]);
    assert!(config.easter_egg.enabled);
    assert_eq!(config.easter_egg.delay_secs, 12.5);
}

#[test]
fn empty_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "boombox.yaml", "{}\n");

    let config = PluginConfig::load(Some(&path)).unwrap();

    assert!(config.is_enabled);
    assert_eq!(config.poll_interval_secs, 1.0);
    assert_eq!(config.boombox.spawn.limit, 1);
    assert_eq!(config.keybinds.change_song_id, 80081);
    assert_eq!(config.hints.boombox_name, "JBL Speaker");
    assert_eq!(config.boombox.playlists.total_tracks(), 0);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = PluginConfig::load(Some(&dir.path().join("nope.yaml")));
    assert!(matches!(result, Err(PluginError::Config(_))));
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "boombox.yaml", "boombox:\n  speakers:\n    count: loud\n");

    let result = PluginConfig::load(Some(&path));
    assert!(matches!(result, Err(PluginError::Config(_))));
}

#[test]
fn environment_overrides_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "boombox.yaml", "banned_message: from file\n");

    // Only this test touches the banned message
    std::env::set_var("BOOMBOX__BANNED_MESSAGE", "from env");
    let config = PluginConfig::load(Some(&path));
    std::env::remove_var("BOOMBOX__BANNED_MESSAGE");

    assert_eq!(config.unwrap().banned_message, "from env");
}

#[test]
fn loaded_config_validates_against_audio_dir() {
    let audio = tempfile::tempdir().unwrap();
    fs::write(audio.path().join("intro.ogg"), b"OggS").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "boombox.yaml",
        &format!(
            "audio_path: {}\nboombox:\n  speakers:\n    volume: 4\n  playlists:\n    short:\n      tracks: [intro, outro]\n",
            audio.path().display()
        ),
    );

    let mut config = PluginConfig::load(Some(&path)).unwrap();
    config.validate().unwrap();

    assert_eq!(config.audio_path, audio.path());
    assert_eq!(config.boombox.speakers.volume, 1.0);
    assert_eq!(
        config.missing_track_files(),
        vec![audio.path().join("outro.ogg")]
    );
}
