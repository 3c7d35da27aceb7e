/// Boombox - configuration checker and offline round simulator
use boombox_playback::EntityId;
use boombox_plugin::{
    backends::SimulatedBackend,
    config::PluginConfig,
    host::{HeldItem, Host, LogHost, PlayerRef, TrackedItem},
    BoomboxPlugin, BoomboxService,
};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "boombox")]
#[command(about = "Boombox plugin tools", long_about = None)]
struct Cli {
    /// Configuration file path (YAML or TOML)
    #[arg(short, long, global = true, env = "BOOMBOX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and look for missing clip files
    Check {
        /// Print the normalised configuration as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play one round against the simulated audio backend
    Simulate {
        /// Round length in seconds
        #[arg(short, long, default_value_t = 30)]
        seconds: u64,

        /// Length of every simulated clip in seconds
        #[arg(long, default_value_t = 10)]
        clip_seconds: u64,

        /// Seed for spawns and shuffles
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = PluginConfig::load(cli.config.as_deref());

    // Initialize tracing
    let default_filter = if config.as_ref().is_ok_and(|c| c.debug) {
        "boombox_plugin=debug,boombox_playback=debug"
    } else {
        "boombox_plugin=info,boombox_playback=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = config?;
    config.validate()?;

    match cli.command {
        Commands::Check { json } => check(&config, json)?,
        Commands::Simulate {
            seconds,
            clip_seconds,
            seed,
        } => simulate(config, seconds, clip_seconds, seed).await?,
    }

    Ok(())
}

fn check(config: &PluginConfig, json: bool) -> anyhow::Result<()> {
    println!("Audio path: {}", config.audio_path.display());
    for (category, playlist) in config.boombox.playlists.iter() {
        println!(
            "{:<6} {:<24} {} track(s)",
            category.name(),
            playlist.name,
            playlist.len()
        );
    }

    let missing = config.missing_track_files();
    for path in &missing {
        println!("Missing clip file: {}", path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    }

    if !missing.is_empty() {
        anyhow::bail!("{} clip file(s) missing", missing.len());
    }
    println!("Configuration OK");
    Ok(())
}

async fn simulate(
    config: PluginConfig,
    seconds: u64,
    clip_seconds: u64,
    seed: u64,
) -> anyhow::Result<()> {
    let backend = SimulatedBackend::new(Duration::from_secs(clip_seconds))
        .with_logging(config.audio_debug);
    let host: Arc<dyn Host> = Arc::new(LogHost);
    let mut plugin = BoomboxPlugin::new(config.clone(), backend, host).with_seed(seed);
    let loaded = plugin.on_enabled()?;
    tracing::info!("Simulating a {}s round with {} clip(s)", seconds, loaded);

    // Spawn boomboxes the way the host would
    let mut rng = StdRng::seed_from_u64(seed);
    let tracked: Vec<TrackedItem> = config
        .boombox
        .spawn
        .roll(&mut rng)
        .into_iter()
        .zip(1u16..)
        .map(|(point, serial)| {
            tracing::info!("Boombox spawned at {}", point.location);
            TrackedItem::pickup(EntityId::new(serial))
        })
        .collect();

    let dj = PlayerRef::new("76561198000000000@steam", "DJ");
    let mut service = BoomboxService::new(plugin);
    service.start_round(&tracked, &[dj.id.clone()]).await;

    if let Some(first) = tracked.first() {
        let shared = service.plugin();
        let mut plugin = shared.lock().await;
        let held = Some(HeldItem {
            entity: first.entity,
            radio_on: true,
        });
        let loop_key = plugin.config().keybinds.loop_song_id;

        plugin.on_acquired(&dj, first.entity);
        plugin.on_toggling_radio(&dj, first.entity, true);
        // Off -> Repeat Song -> Cycle Playlist
        plugin.on_keybind_pressed(&dj, held, loop_key);
        plugin.on_keybind_pressed(&dj, held, loop_key);
    } else {
        tracing::warn!("No boombox spawned this round");
    }

    let step = Duration::from_secs(1);
    for _ in 0..seconds {
        tokio::time::sleep(step).await;
        service.plugin().lock().await.backend_mut().advance(step);
    }

    service.end_round().await;
    tracing::info!("Simulation finished");
    Ok(())
}
