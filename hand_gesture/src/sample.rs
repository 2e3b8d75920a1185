//! One frame of output from the hand detector.

use serde::{Deserialize, Serialize};

use crate::interpreter::Pose;

/// Landmarks reported per hand (wrist + four joints on each finger).
pub const LANDMARK_COUNT: usize = 21;
/// Thumb metacarpophalangeal joint — the thumb's base for steering.
pub const THUMB_MCP: usize = 2;
pub const THUMB_TIP: usize = 4;

/// Order of `HandSample::fingers_up`.
pub const FINGER_NAMES: [&str; 5] = ["thumb", "index", "middle", "ring", "pinky"];

/// A landmark position in image pixels, `y` growing downward.
///
/// Serialized as a two-element array `[x, y]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Landmark { x, y }
    }
}

impl From<[f32; 2]> for Landmark {
    fn from([x, y]: [f32; 2]) -> Self {
        Landmark { x, y }
    }
}

impl From<Landmark> for [f32; 2] {
    fn from(l: Landmark) -> Self {
        [l.x, l.y]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandSample {
    /// Thumb, index, middle, ring, pinky.
    pub fingers_up: [bool; 5],
    #[serde(default)]
    pub landmarks:  Vec<Landmark>,
}

impl HandSample {
    pub fn new(fingers_up: [bool; 5], landmarks: Vec<Landmark>) -> Self {
        HandSample { fingers_up, landmarks }
    }

    /// A full 21-landmark hand whose thumb runs from `base` to `tip`.
    ///
    /// The wrist and the other fingers are parked on `base`; only the thumb
    /// joints carry information.
    pub fn with_thumb(fingers_up: [bool; 5], base: Landmark, tip: Landmark) -> Self {
        let mut landmarks = vec![base; LANDMARK_COUNT];
        landmarks[THUMB_MCP + 1] = Landmark::new((base.x + tip.x) / 2.0, (base.y + tip.y) / 2.0);
        landmarks[THUMB_TIP] = tip;
        HandSample { fingers_up, landmarks }
    }

    pub fn landmark(&self, index: usize) -> Option<Landmark> {
        self.landmarks.get(index).copied()
    }

    /// `(dx, dy)` from the thumb base joint to the thumb tip, or `None` when
    /// the detector did not report both.
    pub fn thumb_vector(&self) -> Option<(f32, f32)> {
        let base = self.landmark(THUMB_MCP)?;
        let tip  = self.landmark(THUMB_TIP)?;
        Some((tip.x - base.x, tip.y - base.y))
    }

    pub fn pose(&self) -> Pose {
        Pose::classify(self.fingers_up)
    }
}
