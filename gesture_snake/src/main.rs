//! gesture_snake — interactive entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gesture_snake::app::{run, run_headless};
use gesture_snake::{GameConfig, ScriptedSource};

#[derive(Parser)]
#[command(name = "gesture_snake")]
#[command(about = "Snake steered by hand gestures (keyboard-simulated hand)")]
struct Args {
    /// Game configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Food placement seed; overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks per second; overrides the config file
    #[arg(long)]
    fps: Option<u32>,

    /// Replay a hand script without opening a window
    #[arg(long, requires = "script")]
    headless: bool,

    /// Hand script for headless replay (TOML `[[frame]]` list)
    #[arg(long, requires = "headless")]
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_snake=info,snake_grid=info,hand_gesture=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed { config.seed = Some(seed); }
    if let Some(fps) = args.fps { config.fps = fps; }
    config.validate().context("invalid configuration")?;

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Gesture Snake — thumb steers, open hand locks       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!(
        "  Grid {}×{} (cell {}), {} fps, seed {}",
        config.grid.width,
        config.grid.height,
        config.grid.cell_size,
        config.fps,
        config.seed.map_or_else(|| "random".to_string(), |s| s.to_string()),
    );
    println!();

    if args.headless {
        let Some(path) = &args.script else {
            anyhow::bail!("--headless needs --script");
        };
        let mut source = ScriptedSource::load(path)
            .with_context(|| format!("loading hand script {}", path.display()))?;
        println!("  Replaying {} frames from {}", source.remaining(), path.display());

        let state = run_headless(&config, &mut source)?;
        println!();
        println!("  Frames:     {}", state.frame_counter());
        println!("  Food eaten: {}", state.food_eaten());
        println!("  Length:     {}", state.snake().len());
        println!("  Heading:    {}", state.direction());
        println!("  Phase:      {:?}", state.phase());
        println!();
        return Ok(());
    }

    println!("  Arrows point the thumb · Space opens the hand · F thumb+index");
    println!("  H hides the hand · R restarts · Q quits");
    println!();
    run(config)
}
