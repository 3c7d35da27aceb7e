//! Server-specific keybind settings
//!
//! Players bind three keys in the host's settings menu. A key press reaches
//! the plugin as the numeric setting id, mapped here to a [`KeyAction`].

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    ChangeSong,
    ShuffleSong,
    CycleLoop,
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAction::ChangeSong => write!(f, "ChangeSong"),
            KeyAction::ShuffleSong => write!(f, "ShuffleSong"),
            KeyAction::CycleLoop => write!(f, "LoopSong"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeybindSettings {
    pub change_song_id: i32,
    pub change_song_label: String,
    pub shuffle_song_id: i32,
    pub shuffle_song_label: String,
    pub loop_song_id: i32,
    pub loop_song_label: String,
}

impl Default for KeybindSettings {
    fn default() -> Self {
        Self {
            change_song_id: 80081,
            change_song_label: "Change Song - F".to_string(),
            shuffle_song_id: 80082,
            shuffle_song_label: "Shuffle Song - G".to_string(),
            loop_song_id: 80083,
            loop_song_label: "Loop Song - H".to_string(),
        }
    }
}

impl KeybindSettings {
    /// Action bound to a setting id, if it is one of ours
    pub fn action_for(&self, setting_id: i32) -> Option<KeyAction> {
        if setting_id == self.change_song_id {
            Some(KeyAction::ChangeSong)
        } else if setting_id == self.shuffle_song_id {
            Some(KeyAction::ShuffleSong)
        } else if setting_id == self.loop_song_id {
            Some(KeyAction::CycleLoop)
        } else {
            None
        }
    }

    pub fn label(&self, action: KeyAction) -> &str {
        match action {
            KeyAction::ChangeSong => &self.change_song_label,
            KeyAction::ShuffleSong => &self.shuffle_song_label,
            KeyAction::CycleLoop => &self.loop_song_label,
        }
    }

    /// Whether two actions share a setting id
    pub fn has_duplicate_ids(&self) -> bool {
        self.change_song_id == self.shuffle_song_id
            || self.change_song_id == self.loop_song_id
            || self.shuffle_song_id == self.loop_song_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ids_map_to_actions() {
        let keys = KeybindSettings::default();
        assert_eq!(keys.action_for(80081), Some(KeyAction::ChangeSong));
        assert_eq!(keys.action_for(80082), Some(KeyAction::ShuffleSong));
        assert_eq!(keys.action_for(80083), Some(KeyAction::CycleLoop));
        assert_eq!(keys.action_for(1), None);
        assert!(!keys.has_duplicate_ids());
    }

    #[test]
    fn duplicate_ids_resolve_to_first_action() {
        let keys = KeybindSettings {
            shuffle_song_id: 80081,
            ..KeybindSettings::default()
        };
        assert!(keys.has_duplicate_ids());
        assert_eq!(keys.action_for(80081), Some(KeyAction::ChangeSong));
    }
}
