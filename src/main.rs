//! Lane Hopper entry point
//!
//! Loads the board, takes over the terminal and runs the frame loop.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use lane_hopper::consts::TARGET_FPS;
use lane_hopper::game_loop;
use lane_hopper::platform::{FrameClock, TerminalInput};
use lane_hopper::renderer::TerminalSurface;
use lane_hopper::sim::GameState;
use lane_hopper::GameConfig;

/// Cross the road, ride the river, fill every home.
#[derive(Debug, Parser)]
#[command(name = "lane-hopper", version, about)]
struct Args {
    /// Board configuration (JSON); the classic board when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for traffic variety (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Print the classic board as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if args.dump_config {
        println!("{}", GameConfig::default().to_json()?);
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("could not load board from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    log::info!("Lane Hopper starting (seed {})", config.seed);

    let mut state = GameState::new(config);
    let mut surface = TerminalSurface::new(state.round.field)?;
    if !surface.reports_key_events() {
        // Legacy terminals send auto-repeat as fresh presses
        log::info!("Terminal has no key event types; a held key hops repeatedly");
    }
    let mut input = TerminalInput;
    let mut clock = FrameClock::new(TARGET_FPS);

    let result = game_loop::run(&mut state, &mut surface, &mut input, &mut clock);
    // Restore the terminal before any error is printed
    drop(surface);
    result.map(|_| ())
}
