//! Physics body abstraction.
//!
//! The controller never integrates motion. It reads the grounded flag and
//! velocity from a [`PhysicsBody`] and writes velocity back; the engine behind
//! the trait owns gravity, collision response and speed limits.
//!
//! [`ArcadeBody`] is a minimal stand-in used by the host loop and tests: one
//! floor plane, world bounds, gravity and a horizontal speed cap.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// What the controller needs from a physics engine.
///
/// Velocities are in units per second, y negative = upward.
pub trait PhysicsBody {
    /// True if resting on a supporting surface this frame.
    fn grounded(&self) -> bool;
    fn velocity_x(&self) -> f32;
    fn set_velocity_x(&mut self, v: f32);
    fn velocity_y(&self) -> f32;
    fn set_velocity_y(&mut self, v: f32);
}

/// Physics parameters for [`ArcadeBody`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration.
    pub gravity: f32,
    /// Horizontal speed limit enforced by the body.
    pub max_velocity_x: f32,
    pub world_width: f32,
    pub world_height: f32,
    /// Y of the floor's top surface.
    pub floor_y: f32,
    pub body_half_width: f32,
    pub body_half_height: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1800.0,
            max_velocity_x: 280.0,
            world_width: 960.0,
            world_height: 540.0,
            floor_y: 500.0,
            body_half_width: 20.0,
            body_half_height: 20.0,
        }
    }
}

/// Axis-aligned body resting on a single floor plane.
#[derive(Debug, Clone)]
pub struct ArcadeBody {
    pub config: PhysicsConfig,
    /// Center of the body.
    pub position: Vec2,
    pub velocity: Vec2,
    grounded: bool,
}

impl ArcadeBody {
    pub fn new(config: PhysicsConfig, position: Vec2) -> Self {
        let mut body = Self {
            config,
            position,
            velocity: Vec2::ZERO,
            grounded: false,
        };
        body.resolve_contacts();
        body
    }

    /// Spawns the body standing on the floor at `x`.
    pub fn on_floor(config: PhysicsConfig, x: f32) -> Self {
        let y = config.floor_y - config.body_half_height;
        Self::new(config, Vec2::new(x, y))
    }

    /// Integrates one step of `dt_sec` and refreshes the grounded flag.
    pub fn integrate(&mut self, dt_sec: f32) {
        let cfg = self.config;
        self.velocity.y += cfg.gravity * dt_sec;
        self.velocity.x = self
            .velocity
            .x
            .clamp(-cfg.max_velocity_x, cfg.max_velocity_x);
        self.position = self.position.mul_add(self.velocity, dt_sec);
        self.resolve_contacts();
    }

    fn resolve_contacts(&mut self) {
        let cfg = self.config;
        let feet = self.position.y + cfg.body_half_height;

        self.grounded = false;
        if feet >= cfg.floor_y && self.velocity.y >= 0.0 {
            self.position.y = cfg.floor_y - cfg.body_half_height;
            self.velocity.y = 0.0;
            self.grounded = true;
        }

        let min_x = cfg.body_half_width;
        let max_x = cfg.world_width - cfg.body_half_width;
        if self.position.x < min_x {
            self.position.x = min_x;
            self.velocity.x = self.velocity.x.max(0.0);
        } else if self.position.x > max_x {
            self.position.x = max_x;
            self.velocity.x = self.velocity.x.min(0.0);
        }

        let min_y = cfg.body_half_height;
        if self.position.y < min_y {
            self.position.y = min_y;
            self.velocity.y = self.velocity.y.max(0.0);
        }
    }
}

impl PhysicsBody for ArcadeBody {
    fn grounded(&self) -> bool {
        self.grounded
    }

    fn velocity_x(&self) -> f32 {
        self.velocity.x
    }

    fn set_velocity_x(&mut self, v: f32) {
        self.velocity.x = v;
    }

    fn velocity_y(&self) -> f32 {
        self.velocity.y
    }

    fn set_velocity_y(&mut self, v: f32) {
        self.velocity.y = v;
    }
}

/// Body whose grounded flag and velocity are set directly by the caller.
///
/// Used for replays and scripted scenarios where collision results are known
/// in advance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualBody {
    pub grounded: bool,
    pub velocity: Vec2,
}

impl ManualBody {
    pub fn on_ground() -> Self {
        Self {
            grounded: true,
            velocity: Vec2::ZERO,
        }
    }

    pub fn in_air(velocity_y: f32) -> Self {
        Self {
            grounded: false,
            velocity: Vec2::new(0.0, velocity_y),
        }
    }
}

impl PhysicsBody for ManualBody {
    fn grounded(&self) -> bool {
        self.grounded
    }

    fn velocity_x(&self) -> f32 {
        self.velocity.x
    }

    fn set_velocity_x(&mut self, v: f32) {
        self.velocity.x = v;
    }

    fn velocity_y(&self) -> f32 {
        self.velocity.y
    }

    fn set_velocity_y(&mut self, v: f32) {
        self.velocity.y = v;
    }
}
