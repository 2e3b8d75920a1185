//! Pose classification, the lock state machine and thumb steering.

use snake_grid::Direction;
use tracing::debug;

use crate::sample::HandSample;

// ════════════════════════════════════════════════════════════════════════════
// Pose — what the finger-up vector means
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pose {
    /// All five fingers up.
    OpenHand,
    /// Thumb up, everything else folded.
    ThumbOnly,
    /// Any other combination.
    Other,
}

impl Pose {
    pub fn classify(fingers_up: [bool; 5]) -> Pose {
        match fingers_up {
            [true, true,  true,  true,  true ] => Pose::OpenHand,
            [true, false, false, false, false] => Pose::ThumbOnly,
            _                                  => Pose::Other,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LockState — transition table
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LockState {
    #[default]
    Unlocked,
    Locked,
}

impl LockState {
    /// Open hand locks, thumb-only unlocks, every other pose keeps the
    /// current state.
    pub fn next(self, pose: Pose) -> LockState {
        match (self, pose) {
            (_,     Pose::OpenHand)  => LockState::Locked,
            (_,     Pose::ThumbOnly) => LockState::Unlocked,
            (state, Pose::Other)     => state,
        }
    }

    pub fn is_locked(self) -> bool {
        self == LockState::Locked
    }
}

/// Direction suggested by a thumb vector `(dx, dy)`.
///
/// The longer axis wins; equal magnitudes count as vertical.
pub fn propose_direction(dx: f32, dy: f32) -> Direction {
    if dx.abs() > dy.abs() {
        if dx > 0.0 { Direction::Right } else { Direction::Left }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureInterpreter
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureState {
    pub lock:              LockState,
    /// Last direction this interpreter committed.
    pub pending_direction: Direction,
}

impl GestureState {
    pub fn lock_engaged(&self) -> bool {
        self.lock.is_locked()
    }
}

#[derive(Clone, Debug, Default)]
pub struct GestureInterpreter {
    state: GestureState,
}

impl GestureInterpreter {
    pub fn new(initial: Direction) -> Self {
        GestureInterpreter {
            state: GestureState {
                lock:              LockState::Unlocked,
                pending_direction: initial,
            },
        }
    }

    pub fn state(&self) -> &GestureState { &self.state }

    pub fn is_locked(&self) -> bool { self.state.lock_engaged() }

    /// Process one frame and return the direction the game should commit.
    ///
    /// `current` is the game's committed direction; it comes back unchanged
    /// when there is no hand, the lock is engaged, the thumb landmarks are
    /// missing, or the thumb points straight back the way the snake came.
    pub fn observe(&mut self, sample: Option<&HandSample>, current: Direction) -> Direction {
        let Some(sample) = sample else {
            return current;
        };

        let pose = sample.pose();
        let next = self.state.lock.next(pose);
        if next != self.state.lock {
            debug!(?pose, from = ?self.state.lock, to = ?next, "lock state changed");
            self.state.lock = next;
        }
        if self.state.lock.is_locked() {
            return current;
        }

        let Some((dx, dy)) = sample.thumb_vector() else {
            return current;
        };
        let proposed = propose_direction(dx, dy);
        if proposed == current.opposite() {
            return current;
        }
        if proposed != current {
            debug!(from = %current, to = %proposed, dx, dy, "direction changed");
        }
        self.state.pending_direction = proposed;
        proposed
    }

    /// Forget the lock and start over heading `direction`.
    pub fn reset(&mut self, direction: Direction) {
        self.state = GestureState {
            lock:              LockState::Unlocked,
            pending_direction: direction,
        };
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
