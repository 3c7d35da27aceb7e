/// Boombox plugin - game host glue for the boombox playback core
pub mod backends;
pub mod commands;
pub mod config;
pub mod easter_egg;
pub mod error;
pub mod hints;
pub mod host;
pub mod keybinds;
pub mod plugin;
pub mod runtime;

pub use error::{PluginError, Result};
pub use plugin::BoomboxPlugin;
pub use runtime::{BoomboxService, LoopTask};
