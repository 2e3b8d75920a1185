//! # hand_gesture
//!
//! Converts one frame's hand sample (finger-up vector + landmark list) into
//! a steering command for the snake.
//!
//! ## Pose → Action mapping
//!
//! | Pose | Fingers up | Action |
//! |---|---|---|
//! | Open hand | all five | Engage the lock — steering is ignored |
//! | Thumb only | thumb | Release the lock, then steer by thumb |
//! | Anything else | — | Lock state unchanged; steer only if unlocked |
//!
//! Steering reads the vector from the thumb's base joint (landmark 2) to
//! its tip (landmark 4).  The dominant axis picks the direction; a
//! proposal that would reverse the snake onto itself is dropped.
//!
//! A frame without a hand changes nothing.

pub mod interpreter;
pub mod sample;

pub use interpreter::{propose_direction, GestureInterpreter, GestureState, LockState, Pose};
pub use sample::{HandSample, Landmark, FINGER_NAMES, LANDMARK_COUNT, THUMB_MCP, THUMB_TIP};
