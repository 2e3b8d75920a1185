//! Hand samples, from a keyboard simulation or a replay script.
//!
//! The controller only ever sees `Option<HandSample>` per tick, so it does
//! not know whether samples came from a camera pipeline, the keyboard
//! simulator or a script.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use hand_gesture::{HandSample, Landmark};
use snake_grid::Direction;

/// Side length of the simulated camera image, in pixels.
pub const CAMERA_SIZE: f32 = 600.0;
/// Length of the simulated thumb, base joint to tip.
const THUMB_LEN: f32 = 90.0;

#[derive(Debug, Error)]
pub enum SourceError {
    /// The source is gone for good; no more ticks will be delivered.
    #[error("hand source unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read hand script {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid hand script: {0}")]
    Script(#[from] toml::de::Error),
}

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait — unified interface for the simulator and replays
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver one hand sample per tick.
pub trait HandSource {
    /// `Ok(None)` means no hand this frame.
    fn next_sample(&mut self) -> Result<Option<HandSample>, SourceError>;
}

// ════════════════════════════════════════════════════════════════════════════
// SimHand — keyboard simulation
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    /// Thumb-only pose pointing this way (arrow keys).
    Point(Direction),
    /// Change the finger pose, keeping the thumb where it is.
    Pose(SimPose),
    /// Take the hand out of frame.
    Hide,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPose {
    ThumbOnly,   // T
    OpenHand,    // Space
    ThumbIndex,  // F
}

impl SimPose {
    pub fn fingers_up(self) -> [bool; 5] {
        match self {
            SimPose::ThumbOnly  => [true, false, false, false, false],
            SimPose::OpenHand   => [true, true,  true,  true,  true ],
            SimPose::ThumbIndex => [true, true,  false, false, false],
        }
    }
}

/// A synthetic hand held in front of a virtual camera.
///
/// The window sends [`SimInput`] events over a channel; each tick the hand
/// applies whatever arrived and reports its current pose.  Starts out of
/// frame.
pub struct SimHand {
    rx:       Receiver<SimInput>,
    visible:  bool,
    pose:     SimPose,
    pointing: Direction,
}

impl SimHand {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimHand {
            rx,
            visible:  false,
            pose:     SimPose::ThumbOnly,
            pointing: Direction::Right,
        }
    }

    fn apply(&mut self, input: SimInput) {
        debug!(?input, "sim hand input");
        match input {
            SimInput::Point(dir) => {
                self.visible  = true;
                self.pose     = SimPose::ThumbOnly;
                self.pointing = dir;
            }
            SimInput::Pose(pose) => {
                self.visible = true;
                self.pose    = pose;
            }
            SimInput::Hide => self.visible = false,
        }
    }

    /// The sample the hand currently produces.
    pub fn sample(&self) -> Option<HandSample> {
        if !self.visible {
            return None;
        }
        let base = Landmark::new(CAMERA_SIZE / 2.0, CAMERA_SIZE / 2.0);
        let (dx, dy) = self.pointing.offset();
        let tip = Landmark::new(base.x + dx as f32 * THUMB_LEN, base.y + dy as f32 * THUMB_LEN);
        Some(HandSample::with_thumb(self.pose.fingers_up(), base, tip))
    }
}

impl HandSource for SimHand {
    fn next_sample(&mut self) -> Result<Option<HandSample>, SourceError> {
        loop {
            match self.rx.try_recv() {
                Ok(input) => self.apply(input),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    return Err(SourceError::Unavailable("simulation window closed".to_string()));
                }
            }
        }
        Ok(self.sample())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ScriptedSource — TOML replay
// ════════════════════════════════════════════════════════════════════════════

/// One scripted frame, emitted `repeat` times.  No `hand` table means no
/// hand detected.
///
/// ```toml
/// [[frame]]
/// repeat = 15
///
/// [[frame]]
/// repeat = 3
/// [frame.hand]
/// fingers_up = [true, false, false, false, false]
/// landmarks  = [[0, 0], [0, 0], [300, 300], [300, 260], [300, 210]]
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ScriptFrame {
    #[serde(default = "one")]
    pub repeat: u32,
    #[serde(default)]
    pub hand:   Option<HandSample>,
}

fn one() -> u32 { 1 }

#[derive(Deserialize)]
struct Script {
    #[serde(default, rename = "frame")]
    frames: Vec<ScriptFrame>,
}

/// Replays a fixed list of frames, then reports itself unavailable.
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    frames:  Vec<ScriptFrame>,
    index:   usize,
    emitted: u32,
}

impl ScriptedSource {
    pub fn new(frames: Vec<ScriptFrame>) -> Self {
        ScriptedSource { frames, index: 0, emitted: 0 }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, SourceError> {
        let script: Script = toml::from_str(text)?;
        Ok(Self::new(script.frames))
    }

    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Ticks left before the script runs out.
    pub fn remaining(&self) -> u64 {
        let rest: u64 = self.frames.iter().skip(self.index).map(|f| u64::from(f.repeat)).sum();
        rest - u64::from(self.emitted).min(rest)
    }
}

impl HandSource for ScriptedSource {
    fn next_sample(&mut self) -> Result<Option<HandSample>, SourceError> {
        while let Some(frame) = self.frames.get(self.index) {
            if self.emitted < frame.repeat {
                self.emitted += 1;
                return Ok(frame.hand.clone());
            }
            self.index  += 1;
            self.emitted = 0;
        }
        Err(SourceError::Unavailable("script finished".to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::{propose_direction, Pose};
    use std::sync::mpsc;

    #[test]
    fn sim_hand_starts_hidden() {
        let (_tx, rx) = mpsc::channel();
        let mut hand = SimHand::new(rx);
        assert_eq!(hand.next_sample().unwrap(), None);
    }

    #[test]
    fn sim_hand_points_with_thumb() {
        let (tx, rx) = mpsc::channel();
        let mut hand = SimHand::new(rx);
        for dir in Direction::ALL {
            tx.send(SimInput::Point(dir)).unwrap();
            let s = hand.next_sample().unwrap().unwrap();
            assert_eq!(s.pose(), Pose::ThumbOnly);
            let (dx, dy) = s.thumb_vector().unwrap();
            assert_eq!(propose_direction(dx, dy), dir);
        }
    }

    #[test]
    fn sim_hand_pose_keeps_pointing() {
        let (tx, rx) = mpsc::channel();
        let mut hand = SimHand::new(rx);
        tx.send(SimInput::Point(Direction::Down)).unwrap();
        tx.send(SimInput::Pose(SimPose::OpenHand)).unwrap();
        let s = hand.next_sample().unwrap().unwrap();
        assert_eq!(s.pose(), Pose::OpenHand);
        let (dx, dy) = s.thumb_vector().unwrap();
        assert_eq!(propose_direction(dx, dy), Direction::Down);

        tx.send(SimInput::Hide).unwrap();
        assert_eq!(hand.next_sample().unwrap(), None);
    }

    #[test]
    fn sim_hand_persists_between_ticks() {
        let (tx, rx) = mpsc::channel();
        let mut hand = SimHand::new(rx);
        tx.send(SimInput::Pose(SimPose::ThumbIndex)).unwrap();
        let first = hand.next_sample().unwrap();
        let second = hand.next_sample().unwrap();
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn sim_hand_unavailable_when_window_gone() {
        let (tx, rx) = mpsc::channel::<SimInput>();
        let mut hand = SimHand::new(rx);
        drop(tx);
        assert!(matches!(hand.next_sample(), Err(SourceError::Unavailable(_))));
    }

    #[test]
    fn script_repeats_and_ends() {
        let mut src = ScriptedSource::from_toml_str(
            r#"
            [[frame]]
            repeat = 2

            [[frame]]
            [frame.hand]
            fingers_up = [true, true, true, true, true]

            [[frame]]
            repeat = 0
            "#,
        ).unwrap();
        assert_eq!(src.remaining(), 3);
        assert_eq!(src.next_sample().unwrap(), None);
        assert_eq!(src.next_sample().unwrap(), None);
        assert_eq!(src.remaining(), 1);
        let hand = src.next_sample().unwrap().unwrap();
        assert_eq!(hand.pose(), Pose::OpenHand);
        assert_eq!(src.remaining(), 0);
        assert!(matches!(src.next_sample(), Err(SourceError::Unavailable(_))));
    }

    #[test]
    fn empty_script_is_immediately_unavailable() {
        let mut src = ScriptedSource::from_toml_str("").unwrap();
        assert!(matches!(src.next_sample(), Err(SourceError::Unavailable(_))));
    }

    #[test]
    fn bad_script_rejected() {
        let err = ScriptedSource::from_toml_str("[[frame]]\nrepeat = \"many\"").unwrap_err();
        assert!(matches!(err, SourceError::Script(_)));
    }
}
