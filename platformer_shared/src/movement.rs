//! Horizontal movement.
//!
//! Each frame the horizontal velocity converges linearly toward a target speed
//! picked from the held direction, limited to `accel * dt` of change. There is
//! no drag: with no direction held the target is zero and the same clamped
//! step brings the body to rest.

use crate::config::ControllerConfig;
use crate::math::signum_or_zero;

/// Direction the character sprite faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// `-1.0` for left, `1.0` for right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Whether a renderer should mirror the sprite.
    pub fn flip_x(self) -> bool {
        self == Facing::Left
    }
}

/// Target speed for the held direction. Right is evaluated after left, so it
/// wins when both are held.
pub fn target_speed(
    config: &ControllerConfig,
    left_held: bool,
    right_held: bool,
    grounded: bool,
) -> f32 {
    let speed = if grounded {
        config.move_speed
    } else {
        config.air_move_speed
    };

    let mut target = 0.0;
    if left_held {
        target = -speed;
    }
    if right_held {
        target = speed;
    }
    target
}

/// Computes horizontal velocity and tracks facing.
#[derive(Debug, Clone, Default)]
pub struct MovementController {
    facing: Facing,
}

impl MovementController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Returns the new horizontal velocity for this frame.
    pub fn step(
        &mut self,
        config: &ControllerConfig,
        left_held: bool,
        right_held: bool,
        grounded: bool,
        velocity_x: f32,
        delta_ms: f64,
    ) -> f32 {
        let target = target_speed(config, left_held, right_held, grounded);

        match signum_or_zero(target) {
            s if s > 0.0 => self.facing = Facing::Right,
            s if s < 0.0 => self.facing = Facing::Left,
            _ => {}
        }

        // A negative or NaN delta yields no change rather than an inverted clamp.
        let max_change = (config.accel * (delta_ms / 1000.0) as f32).max(0.0);
        let change = (target - velocity_x).clamp(-max_change, max_change);
        velocity_x + change
    }
}
