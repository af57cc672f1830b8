//! Ghost Raid headless runner
//!
//! Drives the simulation with the autopilot at the configured frame rate.
//! Windowing and drawing live outside this crate; this binary exercises the
//! whole game loop without them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ghost_raid::audio::{AudioManager, LogBackend, SoundEffect};
use ghost_raid::autopilot::Autopilot;
use ghost_raid::sim::{GameEvent, GamePhase, World, clamp_frame_time, tick};
use ghost_raid::view::build_snapshot;
use ghost_raid::{AssetRegistry, GameSettings};

#[derive(Parser, Debug)]
#[command(name = "ghost-raid", about = "Run the Ghost Raid simulation headless")]
struct Args {
    /// Settings file (JSON); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding player.png, ghost.png and pewpew.ogg
    #[arg(long)]
    assets: Option<PathBuf>,
    /// Number of frames to simulate
    #[arg(long, default_value_t = 3000)]
    frames: u64,
    /// Write the final render snapshot here as JSON
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// Stop at the first game over instead of restarting
    #[arg(long)]
    no_restart: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    log::info!("Ghost Raid (headless) starting...");

    let settings = match &args.config {
        Some(path) => GameSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => GameSettings::default(),
    };

    let assets = match &args.assets {
        Some(dir) => AssetRegistry::load(dir)
            .with_context(|| format!("loading assets from {}", dir.display()))?,
        None => {
            log::info!("No asset directory given, using placeholder sprites");
            AssetRegistry::placeholder()
        }
    };

    if let Some(path) = assets.sound_path(SoundEffect::Shoot) {
        log::info!("Shoot cue: {}", path.display());
    }

    let dt = clamp_frame_time(settings.frame_time(), settings.max_frame_time);
    let mut audio = AudioManager::new(LogBackend::default(), settings.master_volume);
    let mut world = World::new(settings, assets.sprites().clone());
    let mut pilot = Autopilot::new(6, !args.no_restart);

    let mut best_level = world.level;
    let mut runs = 1u32;

    for _ in 0..args.frames {
        let input = pilot.next_input(&world);
        tick(&mut world, &input, dt);

        let events = world.drain_events();
        audio.handle_events(&events);
        for event in &events {
            match event {
                GameEvent::LevelCleared { level } => best_level = best_level.max(*level),
                GameEvent::Restarted { .. } => runs += 1,
                _ => {}
            }
        }

        if args.no_restart && world.phase == GamePhase::GameOver {
            break;
        }
    }

    log::info!(
        "Finished after {} frames: level {}, best level {}, {} run(s), {} sound cues",
        world.frame,
        world.level,
        best_level,
        runs,
        audio.backend().played()
    );

    if let Some(path) = &args.snapshot {
        let json = serde_json::to_string_pretty(&build_snapshot(&world))?;
        std::fs::write(path, json)
            .with_context(|| format!("writing snapshot to {}", path.display()))?;
        log::info!("Snapshot written to {}", path.display());
    }

    Ok(())
}
