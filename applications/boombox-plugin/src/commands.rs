//! Client console command
//!
//! `.boombox` (alias `.bb`) mirrors the three keybinds for players who have
//! not bound them.

use std::str::FromStr;
use thiserror::Error;

pub const COMMAND_NAME: &str = "boombox";
pub const COMMAND_ALIASES: &[&str] = &["bb"];
pub const COMMAND_DESCRIPTION: &str =
    "Boombox controls that can be used instead of server-specific keybinds";
pub const USAGE: &str = "Usage: `.boombox [change | shuffle | loop]`";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoomboxCommand {
    /// `change` or `next`
    Change,
    Shuffle,
    Loop,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid option: {0} - {usage}", usage = USAGE)]
pub struct InvalidOption(pub String);

impl FromStr for BoomboxCommand {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "change" | "next" => Ok(BoomboxCommand::Change),
            "shuffle" => Ok(BoomboxCommand::Shuffle),
            "loop" => Ok(BoomboxCommand::Loop),
            other => Err(InvalidOption(other.to_string())),
        }
    }
}

/// Whether `name` invokes the boombox command
pub fn is_boombox_command(name: &str) -> bool {
    let name = name.trim_start_matches('.');
    name.eq_ignore_ascii_case(COMMAND_NAME)
        || COMMAND_ALIASES
            .iter()
            .any(|alias| name.eq_ignore_ascii_case(alias))
}

/// Reply sent back to the player's console
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub success: bool,
    pub message: String,
}

impl CommandResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
