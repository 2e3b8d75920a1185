//! # gesture_snake
//!
//! Snake steered by hand gestures: the thumb points the way, an open hand
//! locks steering.  Game logic lives in [`controller`]; hand samples come
//! from any [`source::HandSource`]; [`visualizer`] draws the board and a
//! hand-control panel in a `minifb` window.
//!
//! ## Simulation keyboard shortcuts
//!
//! The windowed app drives a synthetic hand from the keyboard.
//!
//! | Key | Hand |
//! |---|---|
//! | Arrow keys | Thumb only, pointing that way (unlocks) |
//! | `Space` | Open hand (locks) |
//! | `T` | Thumb only, keep pointing |
//! | `F` | Thumb + index (lock unchanged) |
//! | `H` | Hide the hand |
//! | `R` | Restart after game over |
//! | `Q` / `Escape` | Quit |
//!
//! ## Headless replay
//!
//! [`app::run_headless`] plays a [`source::ScriptedSource`] (a TOML list of
//! frames) through the same controller and returns the final
//! [`GameState`].

pub mod app;
pub mod config;
pub mod controller;
pub mod source;
pub mod visualizer;

pub use config::{ConfigError, GameConfig};
pub use controller::{GameController, GameState, Phase, TickOutcome};
pub use source::{HandSource, ScriptFrame, ScriptedSource, SimHand, SimInput, SimPose, SourceError};
