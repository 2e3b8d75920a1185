//! Step cadence as a function of food eaten.
//!
//! Cadence counts ticks between moves, so a smaller value is a faster
//! snake.  The curve is linear and floored:
//!
//! ```text
//! cadence(n) = max(min_cadence, base_cadence − n × increment)
//! ```

use serde::{Deserialize, Serialize};

use crate::error::GridError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedCurve {
    /// Ticks per move before any food is eaten.
    pub base_cadence: u32,
    /// Ticks shaved off per food eaten.
    pub increment:    u32,
    /// Floor; the snake never gets faster than this.
    pub min_cadence:  u32,
}

impl Default for SpeedCurve {
    fn default() -> Self {
        SpeedCurve {
            base_cadence: 15,
            increment:    2,
            min_cadence:  3,
        }
    }
}

impl SpeedCurve {
    pub fn validate(&self) -> Result<(), GridError> {
        if self.min_cadence == 0 {
            return Err(GridError::InvalidSpeedCurve("min_cadence must be at least 1"));
        }
        if self.base_cadence < self.min_cadence {
            return Err(GridError::InvalidSpeedCurve("base_cadence must not be below min_cadence"));
        }
        Ok(())
    }

    pub fn cadence(&self, food_eaten: u32) -> u32 {
        self.base_cadence
            .saturating_sub(food_eaten.saturating_mul(self.increment))
            .max(self.min_cadence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_curve_values() {
        let c = SpeedCurve::default();
        assert_eq!(c.cadence(0), 15);
        assert_eq!(c.cadence(1), 13);
        assert_eq!(c.cadence(5), 5);
        assert_eq!(c.cadence(6), 3);
        assert_eq!(c.cadence(7), 3);
    }

    #[test]
    fn non_increasing_and_floored() {
        let c = SpeedCurve::default();
        let mut prev = c.cadence(0);
        for n in 1..200 {
            let cur = c.cadence(n);
            assert!(cur <= prev, "cadence rose at {}", n);
            assert!(cur >= c.min_cadence);
            prev = cur;
        }
    }

    #[test]
    fn huge_counter_does_not_overflow() {
        let c = SpeedCurve { base_cadence: 15, increment: u32::MAX, min_cadence: 3 };
        assert_eq!(c.cadence(u32::MAX), 3);
    }

    #[test]
    fn validate_rejects_zero_floor() {
        let c = SpeedCurve { min_cadence: 0, ..SpeedCurve::default() };
        assert!(c.validate().is_err());
        let c = SpeedCurve { base_cadence: 2, ..SpeedCurve::default() };
        assert!(c.validate().is_err());
        assert!(SpeedCurve::default().validate().is_ok());
    }
}
