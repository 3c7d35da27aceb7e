//! On-screen hint templates
//!
//! Templates use `{playlistname}`, `{songname}`, `{status}`, `{loopmode}`,
//! `{name}` and `{description}` placeholders. A hint is only produced when
//! hints are enabled and the template is non-empty.

use boombox_playback::{LoopMode, TrackChange};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long the banned and keybind reminder hints stay on screen
pub const LONG_HINT: Duration = Duration::from_secs(5);

/// Text to show to one player
#[derive(Debug, Clone, PartialEq)]
pub struct Hint {
    pub text: String,
    pub duration: Duration,
}

impl Hint {
    pub fn new(text: impl Into<String>, duration: Duration) -> Self {
        Self {
            text: text.into(),
            duration,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HintSettings {
    /// Show song, playlist and loop hints
    pub show_hints: bool,

    /// Remind every player at round start to bind the boombox keys
    pub show_keybind_warning: bool,

    /// Item name for the picked up / selected hints
    pub boombox_name: String,
    pub boombox_description: String,

    /// Seconds song hints stay on screen
    pub duration_secs: f32,

    pub picked_up: String,
    pub selected: String,
    pub change_playlist: String,
    pub change_song: String,
    pub shuffle_song: String,
    pub toggle_loop: String,
    pub keybind_warning: String,
}

impl Default for HintSettings {
    fn default() -> Self {
        Self {
            show_hints: true,
            show_keybind_warning: false,
            boombox_name: "JBL Speaker".to_string(),
            boombox_description: "It looks like it's bass boosted!".to_string(),
            duration_secs: 0.75,
            picked_up: "You have picked up the {name}\n{description}".to_string(),
            selected: "You have selected the {name}\n{description}".to_string(),
            change_playlist: "{playlistname}: {songname}".to_string(),
            change_song: "{playlistname}: {songname}".to_string(),
            shuffle_song: "Shuffled song to {songname}".to_string(),
            toggle_loop: "Loop mode: {loopmode}".to_string(),
            keybind_warning: "Make sure the Boombox keys are bound in server-specific settings!"
                .to_string(),
        }
    }
}

impl HintSettings {
    /// Hint duration for song hints
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.duration_secs).unwrap_or(Duration::ZERO)
    }

    pub fn picked_up(&self) -> Option<Hint> {
        self.item_hint(&self.picked_up)
    }

    pub fn selected(&self) -> Option<Hint> {
        self.item_hint(&self.selected)
    }

    /// Shown when the radio range changes; replaces the change-song hint
    pub fn change_playlist(&self, change: &TrackChange) -> Option<Hint> {
        self.track_hint(&self.change_playlist, change)
    }

    pub fn change_song(&self, change: &TrackChange) -> Option<Hint> {
        self.track_hint(&self.change_song, change)
    }

    pub fn shuffle_song(&self, change: &TrackChange) -> Option<Hint> {
        self.track_hint(&self.shuffle_song, change)
    }

    pub fn toggle_loop(&self, mode: LoopMode) -> Option<Hint> {
        let status = if mode == LoopMode::Off {
            "disabled"
        } else {
            "enabled"
        };
        self.song_hint(render(
            &self.toggle_loop,
            &[("{status}", status), ("{loopmode}", mode.label())],
        ))
    }

    /// Round start reminder, independent of `show_hints`
    pub fn keybind_warning(&self) -> Option<Hint> {
        if !self.show_keybind_warning || self.keybind_warning.is_empty() {
            return None;
        }
        Some(Hint::new(self.keybind_warning.clone(), LONG_HINT))
    }

    fn item_hint(&self, template: &str) -> Option<Hint> {
        if self.boombox_name.is_empty() || self.boombox_description.is_empty() {
            return None;
        }
        self.song_hint(render(
            template,
            &[
                ("{name}", self.boombox_name.as_str()),
                ("{description}", self.boombox_description.as_str()),
            ],
        ))
    }

    fn track_hint(&self, template: &str, change: &TrackChange) -> Option<Hint> {
        self.song_hint(render(
            template,
            &[
                ("{playlistname}", change.playlist_name.as_str()),
                ("{songname}", change.track.as_str()),
            ],
        ))
    }

    fn song_hint(&self, text: String) -> Option<Hint> {
        if !self.show_hints || text.is_empty() {
            return None;
        }
        Some(Hint::new(text, self.duration()))
    }
}

fn render(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |text, (key, value)| text.replace(key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use boombox_playback::{Category, EntityId, Track};

    fn change(track: &str) -> TrackChange {
        TrackChange {
            entity: EntityId::new(1),
            category: Category::Short,
            playlist_name: "Chill".to_string(),
            track: Track::new(track),
            shuffled: false,
        }
    }

    #[test]
    fn change_song_fills_placeholders() {
        let hints = HintSettings::default();
        let hint = hints.change_song(&change("lofi.ogg")).unwrap();
        assert_eq!(hint.text, "Chill: lofi");
        assert_eq!(hint.duration, Duration::from_millis(750));
    }

    #[test]
    fn toggle_loop_reports_status_and_mode() {
        let mut hints = HintSettings::default();
        hints.toggle_loop = "Looping is now {status} ({loopmode})".to_string();

        assert_eq!(
            hints.toggle_loop(LoopMode::Off).unwrap().text,
            "Looping is now disabled (Off)"
        );
        assert_eq!(
            hints.toggle_loop(LoopMode::ShuffleAll).unwrap().text,
            "Looping is now enabled (Shuffle All)"
        );
    }

    #[test]
    fn hints_disabled_produce_nothing() {
        let mut hints = HintSettings::default();
        hints.show_hints = false;
        assert!(hints.change_song(&change("a")).is_none());
        assert!(hints.picked_up().is_none());
    }

    #[test]
    fn empty_template_is_skipped() {
        let mut hints = HintSettings::default();
        hints.change_playlist = String::new();
        assert!(hints.change_playlist(&change("a")).is_none());
    }

    #[test]
    fn item_hints_need_name_and_description() {
        let mut hints = HintSettings::default();
        assert_eq!(
            hints.selected().unwrap().text,
            "You have selected the JBL Speaker\nIt looks like it's bass boosted!"
        );
        hints.boombox_description = String::new();
        assert!(hints.selected().is_none());
    }

    #[test]
    fn keybind_warning_is_opt_in() {
        let mut hints = HintSettings::default();
        assert!(hints.keybind_warning().is_none());
        hints.show_keybind_warning = true;
        assert_eq!(hints.keybind_warning().unwrap().duration, LONG_HINT);
    }
}
