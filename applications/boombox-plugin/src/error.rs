/// Plugin error types
use boombox_playback::PlaybackError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PluginError>;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Plugin is disabled in the configuration")]
    Disabled,

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for PluginError {
    fn from(err: config::ConfigError) -> Self {
        PluginError::Config(err.to_string())
    }
}
