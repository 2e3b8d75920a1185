//! Run loops: the interactive window and headless replay.
//!
//! Both loops do the same thing per tick: pull one sample from a
//! [`HandSource`], feed it to [`GameController::step`], and stop once the
//! source is unavailable or a quit was requested.

use std::sync::mpsc;

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

use hand_gesture::HandSample;

use crate::config::GameConfig;
use crate::controller::{GameController, GameState, TickOutcome};
use crate::source::{HandSource, SimHand, SimInput, SourceError};
use crate::visualizer::{Command, Visualizer};

/// Pull one sample.  `None` from the outer option means the source is gone.
fn next_tick<S: HandSource + ?Sized>(source: &mut S) -> Option<Option<HandSample>> {
    match source.next_sample() {
        Ok(sample) => Some(sample),
        Err(SourceError::Unavailable(reason)) => {
            warn!(%reason, "hand source unavailable, stopping");
            None
        }
        Err(e) => {
            warn!(error = %e, "hand source failed, treating as no hand");
            Some(None)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Windowed
// ════════════════════════════════════════════════════════════════════════════

/// Open the game window and play until it closes or Q is pressed.
pub fn run(config: GameConfig) -> Result<()> {
    config.validate()?;

    // ── Sim hand channel ──────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let mut hand = SimHand::new(sim_rx);

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(&config.grid, config.frame_interval(), sim_tx)
        .map_err(|e| anyhow!(e))
        .context("failed to open game window")?;

    let mut game = GameController::new(&config).context("failed to start game")?;
    info!(fps = config.fps, seed = ?config.seed, "window opened");

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Window keys: hand keys go to the sim, the rest come back here.
        for command in vis.poll_input() {
            match command {
                Command::Quit => game.quit(),
                Command::Restart => {
                    game.restart()?;
                }
            }
        }
        if game.quit_requested() { break; }

        // 2. One tick
        let Some(sample) = next_tick(&mut hand) else { break };
        game.step(sample.as_ref());

        // 3. Render
        vis.render(game.state(), game.grid(), game.is_locked(), sample.as_ref());
    }

    info!(food_eaten = game.state().food_eaten(), "window closed");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Headless
// ════════════════════════════════════════════════════════════════════════════

/// Drive ticks from `source` until it runs out, then return the final state.
pub fn run_headless<S: HandSource + ?Sized>(config: &GameConfig, source: &mut S) -> Result<GameState> {
    config.validate()?;
    let mut game = GameController::new(config).context("failed to start game")?;

    while !game.quit_requested() {
        let Some(sample) = next_tick(source) else { break };
        if game.step(sample.as_ref()) == TickOutcome::Collided {
            info!(frame = game.state().frame_counter(), "headless run hit game over");
        }
    }
    Ok(game.state().clone())
}
