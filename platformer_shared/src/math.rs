//! Math types.
//!
//! Kept to what the arcade body needs: a 2D vector in screen space
//! (x to the right, y downward).

use serde::{Deserialize, Serialize};

/// 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns `self + rhs * scale`.
    pub fn mul_add(self, rhs: Self, scale: f32) -> Self {
        Self::new(self.x + rhs.x * scale, self.y + rhs.y * scale)
    }
}

/// Sign of a horizontal speed as used for facing: `-1`, `0` or `1`.
pub fn signum_or_zero(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
